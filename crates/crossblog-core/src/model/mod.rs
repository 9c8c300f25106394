pub mod article;
pub mod wire;

pub use article::{Article, ArticleId, UNASSIGNED_ID};
pub use wire::{ArticleListModel, ArticleModel};
