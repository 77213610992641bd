use std::ops::{Index, IndexMut};
use std::time::Instant;

/// Stable handle to a node in the [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// The sentinel head always lives in the first slot.
    pub(crate) const HEAD: NodeId = NodeId(0);
}

#[derive(Debug, Clone)]
pub(crate) struct Item<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) due_time: Option<Instant>,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    // `None` only for the head.
    item: Option<Item<K, V>>,
    pub(crate) forward: Vec<Option<NodeId>>,
    pub(crate) prev: NodeId,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(item: Item<K, V>, height: usize) -> Node<K, V> {
        debug_assert!(height > 0);
        Node {
            item: Some(item),
            forward: vec![None; height],
            prev: NodeId::HEAD,
        }
    }

    fn head(height: usize) -> Node<K, V> {
        Node {
            item: None,
            forward: vec![None; height],
            prev: NodeId::HEAD,
        }
    }

    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }

    pub(crate) fn item(&self) -> &Item<K, V> {
        match &self.item {
            Some(item) => item,
            None => panic!("the head sentinel holds no entry"),
        }
    }

    pub(crate) fn item_mut(&mut self) -> &mut Item<K, V> {
        match &mut self.item {
            Some(item) => item,
            None => panic!("the head sentinel holds no entry"),
        }
    }

    pub(crate) fn into_item(self) -> Item<K, V> {
        match self.item {
            Some(item) => item,
            None => panic!("the head sentinel holds no entry"),
        }
    }

    pub(crate) fn key(&self) -> &K {
        &self.item().key
    }

    pub(crate) fn entry(&self) -> (&K, &V) {
        let item = self.item();
        (&item.key, &item.value)
    }
}

/// Slot storage for skip list nodes. Freed slots are recycled by later
/// inserts, so a `NodeId` stays valid exactly as long as its node is linked.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new(head_height: usize) -> Arena<K, V> {
        Arena {
            slots: vec![Some(Node::head(head_height))],
            free: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                debug_assert!(self.slots[slot].is_none());
                self.slots[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Node<K, V> {
        debug_assert_ne!(id, NodeId::HEAD);
        match self.slots[id.0].take() {
            Some(node) => {
                self.free.push(id.0);
                node
            }
            None => panic!("node {} was already removed", id.0),
        }
    }

    /// Drops every node except the head and unlinks the head at every level.
    pub(crate) fn clear(&mut self) {
        self.slots.truncate(1);
        self.free.clear();
        let head = &mut self[NodeId::HEAD];
        head.forward.iter_mut().for_each(|link| *link = None);
        head.prev = NodeId::HEAD;
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.0] {
            Some(node) => node,
            None => panic!("dangling node id {}", id.0),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.0] {
            Some(node) => node,
            None => panic!("dangling node id {}", id.0),
        }
    }
}
