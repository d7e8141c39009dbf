//! # Vellum Mercurial Backend
//!
//! Reads site content from Mercurial repositories by driving the `hg`
//! command line with `HGPLAIN=1`. The executable is located on `PATH`
//! when a repository is opened.

pub mod backend;
pub mod changectx;
pub mod command;
pub mod error;
pub mod filectx;
pub mod repository;

pub use backend::HgBackend;
pub use changectx::HgChangeCtx;
pub use command::Hg;
pub use filectx::HgFileCtx;
pub use repository::HgRepository;
