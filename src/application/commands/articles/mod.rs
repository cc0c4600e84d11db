mod publish;
mod service;
mod transition;

pub use publish::PublishArticleCommand;
pub use service::ArticleCommandService;
