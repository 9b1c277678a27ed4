pub mod feed;
pub mod article;
pub mod post;
pub mod digest;
pub mod language;
pub mod run;

pub use feed::*;
pub use article::*;
pub use post::*;
pub use digest::*;
pub use language::*;
pub use run::*;
