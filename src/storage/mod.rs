pub mod project_store;
pub mod workspace;

pub use project_store::{ProjectStore, SharedStore, StoreDocument};
pub use workspace::{SiteWorkspace, WorkspaceFile, file_type};
