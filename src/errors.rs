use crate::spatial::NodeId;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "{} does not exist or has been destroyed.", _0)]
    NodeNotFound(NodeId),
    #[fail(display = "{} can not set self as parent.", _0)]
    CanNotAttachSelfAsParent(NodeId),
    #[fail(
        display = "Attaching {} to {} would create a cycle in the hierarchy.",
        node, parent
    )]
    CyclicHierarchy { node: NodeId, parent: NodeId },
    #[fail(display = "{} is not listed in the children of {:?}.", child, parent)]
    ChildNotFound {
        parent: Option<NodeId>,
        child: NodeId,
    },
    #[fail(display = "{} is being destroyed.", _0)]
    NodeDestroying(NodeId),
    #[fail(display = "The world transform of {} can not be inversed.", _0)]
    DegenerateTransform(NodeId),
    #[fail(display = "Invalid prefab: {}.", _0)]
    InvalidPrefab(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;
