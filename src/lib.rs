#![deny(missing_docs)]
//! An ordered in-memory key-value container built on the skip list data structure.
//! It is a probabilistic data structure that allows for fast insertion, deletion, and lookup of
//! elements, ordered range scans, and constant time access to the smallest and greatest entry.
//!
//! A skip list is a linked list with a number of levels. Each level is a linked list of nodes,
//! where each node contains a key and a value. The keys are sorted in ascending order. The higher
//! levels of the skip list skip over a large number of nodes, which makes lookup operations very
//! efficient. A new node is given a random height: each extra level is half as likely as the one
//! below it, so the expected search cost is logarithmic without any rebalancing.
//!
//! Nodes live in an arena and link to each other by index. Besides the forward links every node
//! keeps a link back to its level 0 predecessor, and the list keeps a link to its last node, which
//! is what makes [`SkipList::max`] and [`SkipList::pop`] cheap.
//!
//! Two flavours are provided:
//!
//! - [`SkipList`] has no locking. Mutating methods take `&mut self`, so it is meant for
//!   single-threaded use or for callers that already provide their own exclusion.
//! - [`ConcurrentSkipList`] wraps a `SkipList` in a single reader-writer lock. Reads share the
//!   lock and writes hold it exclusively, and the handle can be cloned and sent to other threads.
//!
//! This implementation is based on William Pugh's 1990 paper
//! ["Skip Lists: A Probabilistic Alternative to Balanced Trees"].
//!
//! ["Skip Lists: A Probabilistic Alternative to Balanced Trees"]: https://15721.courses.cs.cmu.edu/spring2018/papers/08-oltpindexes1/pugh-skiplists-cacm1990.pdf
//!
//! # Examples
//!
//! The following examples are adapted from the examples in the Rust standard library
//! documentation for [`BTreeMap`].
//!
//! ```
//! use skipkv::SkipList;
//!
//! let mut movie_reviews: SkipList<String, String> = SkipList::new();
//!
//! // Review some movies.
//! movie_reviews.set(
//!     "The Matrix".to_string(),
//!     "My favorite movie.".to_string(),
//! ).unwrap();
//! movie_reviews.set(
//!     "Licorice Pizza".to_string(),
//!     "Not for me.".to_string(),
//! ).unwrap();
//! movie_reviews.set(
//!     "Moulin Rouge".to_string(),
//!     "A guilty pleasure.".to_string(),
//! ).unwrap();
//! movie_reviews.set(
//!     "The Power of the Dog".to_string(),
//!     "Underrated.".to_string(),
//! ).unwrap();
//!
//! // Check for a specific one.
//! // When collections store owned values (String), they can still be
//! // queried using references (&str).
//! if !movie_reviews.contains("Les Misérables") {
//!     println!("We've got {} reviews, but Les Misérables ain't one.",
//!              movie_reviews.size());
//! }
//!
//! // oops, this review has a lot of spelling mistakes, let's delete it.
//! assert!(movie_reviews.delete("The Power of the Dog"));
//!
//! // Look up the values associated with some keys.
//! let to_find = ["Moulin Rouge", "Alice's Adventure in Wonderland"];
//! for &movie in &to_find {
//!     match movie_reviews.get(movie) {
//!         Ok(review) => println!("{movie}: {review}"),
//!         Err(_) => println!("{movie} is un-reviewed."),
//!     }
//! }
//!
//! // Iterate over everything, in order.
//! for (movie, review) in &movie_reviews {
//!     println!("{movie}: \"{review}\"");
//! }
//!
//! // The first and last reviews by title.
//! assert_eq!(movie_reviews.min().unwrap().0, "Licorice Pizza");
//! assert_eq!(movie_reviews.max().unwrap().0, "The Matrix");
//! ```
//!
//! Range scans take any of the standard range types and a visitor that returns whether to
//! continue:
//!
//! ```
//! use std::ops::Bound;
//! use skipkv::SkipList;
//!
//! let list: SkipList<i32, &str> =
//!     SkipList::from([(2, "two"), (3, "three"), (21, "u"), (34, "h"), (62, "j")]);
//!
//! let mut inclusive = Vec::new();
//! list.range(3..=34, |key, _| {
//!     inclusive.push(*key);
//!     true
//! });
//! assert_eq!(inclusive, vec![3, 21, 34]);
//!
//! let mut exclusive = Vec::new();
//! list.range((Bound::Excluded(3), Bound::Excluded(34)), |key, _| {
//!     exclusive.push(*key);
//!     true
//! });
//! assert_eq!(exclusive, vec![21]);
//! ```
//!
//! A `ConcurrentSkipList` can be shared between threads:
//!
//! ```
//! use std::thread;
//! use skipkv::{ConcurrentSkipList, SetOptions, SkipListError};
//!
//! let planets: ConcurrentSkipList<&str, f32> = ConcurrentSkipList::from([
//!     ("Mercury", 0.4),
//!     ("Venus", 0.7),
//!     ("Earth", 1.0),
//! ]);
//!
//! let writer = {
//!     let planets = planets.clone();
//!     thread::spawn(move || planets.set("Mars", 1.5))
//! };
//! writer.join().unwrap().unwrap();
//!
//! assert_eq!(planets.get("Mars"), Ok(1.5));
//! assert_eq!(
//!     planets.set_with("Earth", 2.0, SetOptions::if_absent()),
//!     Err(SkipListError::DuplicateKey),
//! );
//! assert_eq!(planets.pop(), Ok(("Venus", 0.7)));
//! assert_eq!(planets.lpop(), Ok(("Earth", 1.0)));
//! assert_eq!(planets.size(), 2);
//! ```
//!
//! [`BTreeMap`]: https://doc.rust-lang.org/std/collections/struct.BTreeMap.html
mod concurrent_skip_list;
mod config;
mod error;
mod level;
mod node;
mod skip_list;

pub use concurrent_skip_list::ConcurrentSkipList;
pub use config::{SetOptions, SkipListConfig, DEFAULT_MAX_LEVELS, MAX_SUPPORTED_LEVELS};
pub use error::{Result, SkipListError};
pub use skip_list::{Iter, SkipList};
