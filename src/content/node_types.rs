//! Well-known node types, property names and the node type lookups used
//! when splitting content trees and filtering documents.

/// Property holding a node's structural type.
pub const JCR_PRIMARYTYPE: &str = "jcr:primaryType";
/// Property holding a node's mixin types.
pub const JCR_MIXINTYPES: &str = "jcr:mixinTypes";
/// Name of the content child of pages and files.
pub const JCR_CONTENT: &str = "jcr:content";
/// Identity property of principal records.
pub const JCR_UUID: &str = "jcr:uuid";
pub const JCR_MIMETYPE: &str = "jcr:mimeType";
pub const JCR_ENCODING: &str = "jcr:encoding";

pub const NT_UNSTRUCTURED: &str = "nt:unstructured";
pub const NT_FOLDER: &str = "nt:folder";
pub const NT_FILE: &str = "nt:file";
pub const NT_RESOURCE: &str = "nt:resource";
pub const SLING_FOLDER: &str = "sling:Folder";
pub const SLING_ORDERED_FOLDER: &str = "sling:OrderedFolder";
pub const CQ_PAGE: &str = "cq:Page";
pub const CQ_PAGE_CONTENT: &str = "cq:PageContent";
pub const CQ_TEMPLATE: &str = "cq:Template";

pub const REP_USER: &str = "rep:User";
pub const REP_SYSTEM_USER: &str = "rep:SystemUser";
pub const REP_GROUP: &str = "rep:Group";

/// Mixin added to content marked as activated.
pub const CQ_REPLICATION_STATUS: &str = "cq:ReplicationStatus";
pub const CQ_LAST_REPLICATED: &str = "cq:lastReplicated";
pub const CQ_LAST_REPLICATION_ACTION: &str = "cq:lastReplicationAction";
pub const REPLICATION_ACTION_ACTIVATE: &str = "Activate";

/// Node types that are stored in a directory of their own instead of being
/// embedded in the parent's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    Folder,
    SlingFolder,
    SlingOrderedFolder,
    Page,
}

impl BoundaryType {
    pub const ALL: [BoundaryType; 4] = [
        BoundaryType::Folder,
        BoundaryType::SlingFolder,
        BoundaryType::SlingOrderedFolder,
        BoundaryType::Page,
    ];

    pub fn from_name(node_type: &str) -> Option<Self> {
        match node_type {
            NT_FOLDER => Some(Self::Folder),
            SLING_FOLDER => Some(Self::SlingFolder),
            SLING_ORDERED_FOLDER => Some(Self::SlingOrderedFolder),
            CQ_PAGE => Some(Self::Page),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Folder => NT_FOLDER,
            Self::SlingFolder => SLING_FOLDER,
            Self::SlingOrderedFolder => SLING_ORDERED_FOLDER,
            Self::Page => CQ_PAGE,
        }
    }
}

/// Check if a dedicated directory is created for the given node type.
#[inline]
pub fn is_boundary_type(node_type: &str) -> bool {
    BoundaryType::from_name(node_type).is_some()
}

/// Pages and templates; their content node can be marked as replicated.
#[inline]
pub fn is_replicable_type(node_type: &str) -> bool {
    matches!(node_type, CQ_PAGE | CQ_TEMPLATE)
}

/// Users and groups, whose identity property must never be dropped.
#[inline]
pub fn is_principal_type(node_type: &str) -> bool {
    matches!(node_type, REP_USER | REP_SYSTEM_USER | REP_GROUP)
}
