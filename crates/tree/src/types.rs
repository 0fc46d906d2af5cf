/// Handle to a node owned by a [`Tree`](crate::Tree) arena.
///
/// Keys are allocated by the tree and stay valid for its whole lifetime,
/// including after the node is detached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);
