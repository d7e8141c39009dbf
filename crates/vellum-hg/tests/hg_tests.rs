use vellum_core::{Backend, Revision, RevisionId, VellumError};
use vellum_hg::HgBackend;

mod common;

use common::{AUTHOR, blog_repo, commit, write};

#[test]
#[ignore = "requires hg"]
fn test_default_revision() {
    let dir = blog_repo();
    write(dir.path(), "content/draft.rst", "not committed\n");

    let ctx = HgBackend.open(dir.path()).unwrap().changectx(Revision::Default).unwrap();

    assert_eq!(
        ctx.files(),
        [
            ".hgignore",
            "config.yaml",
            "content/about.rst",
            "content/post/first.rst"
        ]
    );
    assert_eq!(ctx.revision_id().as_str().len(), 40);
    assert!(!ctx.needs_reload());

    let about = ctx.filectx("content/about.rst").unwrap();
    assert_eq!(about.content().unwrap(), "About\n=====\n\nHello.\n");
    assert_eq!(about.author(), Some(AUTHOR));
    assert_eq!(about.mdate(), None);
    assert!(!ctx.filectx_needs_reload(about.as_ref()));
}

#[test]
#[ignore = "requires hg"]
fn test_stale_after_commit() {
    let dir = blog_repo();
    let repo = HgBackend.open(dir.path()).unwrap();
    let before = repo.changectx(Revision::Default).unwrap();
    let about = before.filectx("content/about.rst").unwrap();
    let first = before.filectx("content/post/first.rst").unwrap();

    write(dir.path(), "content/post/first.rst", "Rewritten\n");
    commit(dir.path(), "rewrite first");

    assert!(before.needs_reload());
    assert!(!before.filectx_needs_reload(about.as_ref()));
    assert!(before.filectx_needs_reload(first.as_ref()));

    let after = repo.changectx(Revision::Default).unwrap();
    assert!(!after.needs_reload());
    let rewritten = after.filectx("content/post/first.rst").unwrap();
    assert_eq!(rewritten.date(), first.date());
    assert!(rewritten.mdate().is_some());
}

#[test]
#[ignore = "requires hg"]
fn test_working_dir() {
    let dir = blog_repo();
    write(dir.path(), "content/post/draft.rst", "Draft\n");
    write(dir.path(), "build/index.html", "<html></html>");

    let ctx = HgBackend
        .open(dir.path())
        .unwrap()
        .changectx(Revision::WorkingDir)
        .unwrap();

    assert!(ctx.contains("content/post/draft.rst"));
    assert!(!ctx.contains("build/index.html"));
    assert!(ctx.needs_reload());

    let draft = ctx.filectx("content/post/draft.rst").unwrap();
    assert_eq!(draft.content().unwrap(), "Draft\n");
    assert_eq!(draft.mdate(), None);
}

#[test]
#[ignore = "requires hg"]
fn test_empty_repository() {
    let dir = tempfile::TempDir::new().unwrap();
    HgBackend.create_repo(dir.path()).unwrap();
    let repo = HgBackend.open(dir.path()).unwrap();

    let err = repo.changectx(Revision::Default).unwrap_err();
    assert!(matches!(err, VellumError::RevisionNotFound { .. }));

    let ctx = repo.changectx(Revision::WorkingDir).unwrap();
    assert_eq!(ctx.revision_id().as_str(), RevisionId::WORKING_DIR);
    assert!(ctx.contains("config.yaml"));
    assert!(ctx.contains(".hgignore"));
}

#[test]
#[ignore = "requires hg"]
fn test_create_repo_twice_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    HgBackend.create_repo(dir.path()).unwrap();
    assert!(HgBackend.supported(dir.path()));

    let err = HgBackend.create_repo(dir.path()).unwrap_err();
    assert!(matches!(err, VellumError::AlreadyInitialized { .. }));
}

#[test]
fn test_create_repo_refuses_existing_content() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path(), "config.yaml", "TITLE: mine\n");

    let err = HgBackend.create_repo(dir.path()).unwrap_err();
    assert!(matches!(err, VellumError::AlreadyInitialized { .. }));
    assert!(!dir.path().join(".hg").exists());
}

#[test]
#[ignore = "requires hg"]
fn test_failed_starter_write_leaves_no_repository() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".hgignore")).unwrap();

    assert!(HgBackend.create_repo(dir.path()).is_err());
    assert!(!dir.path().join(".hg").exists());
    assert!(dir.path().join("config.yaml").is_file());
}
