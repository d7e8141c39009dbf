mod common;

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use common::{commit, engine, starter_repo, working_dir_engine, write};
use tempfile::TempDir;
use vellum_engine::{Engine, EngineSettings, ReloadOutcome, assets, templates};

#[test]
fn test_first_reload_publishes_snapshot() {
    let repo = starter_repo();
    let engine = engine(repo.path());
    assert!(engine.current().is_none());
    assert!(engine.needs_reload());

    let outcome = engine.reload().unwrap();
    match outcome {
        ReloadOutcome::Reloaded {
            generation,
            entries,
            ..
        } => {
            assert_eq!(generation, 1);
            assert_eq!(entries, 3);
        },
        other => panic!("unexpected outcome {:?}", other),
    }

    let snapshot = engine.current().unwrap();
    assert_eq!(snapshot.generation(), 1);
    assert_eq!(snapshot.config().get_str("TITLE"), Some("My Vellum blog"));
    assert_eq!(snapshot.blog().get_all(true).len(), 2);
    assert_eq!(snapshot.blog().tags(), ["example", "lorem-ipsum", "vellum"]);
    assert_eq!(
        snapshot.blog().resolve_alias("/about-me/").map(|t| t.slug.as_str()),
        Some("about")
    );
    assert_eq!(engine.metrics().reloaded(), 1);
}

#[test]
fn test_unchanged_repository_is_fresh() {
    let repo = starter_repo();
    let engine = engine(repo.path());

    engine.reload().unwrap();
    let first = engine.current().unwrap();

    assert!(!engine.needs_reload());
    assert_eq!(engine.reload().unwrap(), ReloadOutcome::Fresh);
    assert!(Arc::ptr_eq(&first, &engine.current().unwrap()));
}

#[test]
fn test_new_commit_bumps_generation() {
    let repo = starter_repo();
    let engine = engine(repo.path());
    engine.reload().unwrap();

    write(
        repo.path(),
        "content/post/second.rst",
        "Second\n======\n\n.. tags: rust\n\nBody.\n",
    );
    commit(repo.path(), "second post");

    assert!(engine.needs_reload());
    let outcome = engine.reload().unwrap();
    assert!(outcome.is_reloaded());

    let snapshot = engine.current().unwrap();
    assert_eq!(snapshot.generation(), 2);
    assert!(snapshot.blog().get("post/second").is_some());
    assert_eq!(snapshot.blog().get_by_tag(&["rust"]).len(), 1);
}

#[test]
fn test_held_snapshot_survives_reload() {
    let repo = starter_repo();
    let engine = engine(repo.path());
    engine.reload().unwrap();
    let held = engine.current().unwrap();

    fs::remove_file(repo.path().join("content/about.rst")).unwrap();
    commit(repo.path(), "drop about");
    engine.reload().unwrap();

    assert!(held.blog().get("about").is_some());
    assert!(engine.current().unwrap().blog().get("about").is_none());
}

#[test]
fn test_missing_root_is_skipped() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir.path().join("missing"));

    assert_eq!(engine.reload().unwrap(), ReloadOutcome::Skipped);
    assert!(engine.current().is_none());
}

#[test]
fn test_directory_without_repository_fails() {
    let dir = TempDir::new().unwrap();
    let engine = engine(dir.path());

    assert!(engine.reload().is_err());
    assert!(engine.current().is_none());
    assert_eq!(engine.metrics().failed(), 1);
}

#[test]
fn test_missing_config_keeps_previous_snapshot() {
    let repo = starter_repo();
    let engine = engine(repo.path());
    engine.reload().unwrap();

    fs::remove_file(repo.path().join("config.yaml")).unwrap();
    commit(repo.path(), "remove config");

    let err = engine.reload().unwrap_err();
    assert!(err.is_config_missing());
    assert_eq!(engine.current().unwrap().generation(), 1);
}

#[test]
fn test_concurrent_reloads_publish_once() {
    let repo = starter_repo();
    let engine = Arc::new(engine(repo.path()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.reload().unwrap())
        })
        .collect();
    let outcomes: Vec<ReloadOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(outcomes.iter().filter(|o| o.is_reloaded()).count(), 1);
    assert!(
        outcomes
            .iter()
            .all(|o| matches!(o, ReloadOutcome::Reloaded { .. } | ReloadOutcome::Fresh | ReloadOutcome::Superseded))
    );
    assert_eq!(engine.current().unwrap().generation(), 1);
}

#[test]
fn test_hooks_run_after_publication() {
    let repo = starter_repo();
    let engine = engine(repo.path());
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    engine.hooks().register("count", move |snapshot| {
        assert_eq!(snapshot.blog().len(), 3);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    engine.reload().unwrap();
    engine.reload().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_future_post_hidden_unless_debug() {
    let repo = starter_repo();
    write(
        repo.path(),
        "content/post/future.rst",
        "Future\n======\n\n.. date: 2999-01-01\n\nLater.\n",
    );
    commit(repo.path(), "future post");

    let engine = engine(repo.path());
    engine.reload().unwrap();
    assert!(engine.current().unwrap().blog().get("post/future").is_none());

    let settings = EngineSettings::builder()
        .repo_path(repo.path())
        .debug(true)
        .build()
        .unwrap();
    let debug_engine = Engine::new(settings);
    debug_engine.reload().unwrap();
    assert!(debug_engine.current().unwrap().blog().get("post/future").is_some());
}

#[test]
fn test_future_post_visible_in_interactive_mode() {
    let repo = starter_repo();
    write(
        repo.path(),
        "content/post/future.rst",
        "Future\n======\n\n.. date: 2999-01-01\n\nLater.\n",
    );
    commit(repo.path(), "future post");

    let settings = EngineSettings::builder()
        .repo_path(repo.path())
        .interactive(true)
        .debug(false)
        .build()
        .unwrap();
    let engine = Engine::new(settings);
    engine.reload().unwrap();

    let snapshot = engine.current().unwrap();
    assert!(snapshot.blog().get("post/future").is_some());
    assert_eq!(snapshot.blog().get_all(true)[0].slug(), "post/future");
}

#[test]
fn test_separate_engines_build_equal_blogs() {
    let repo = starter_repo();
    let first = Arc::new(engine(repo.path()));
    let second = Arc::new(engine(repo.path()));

    let handles: Vec<_> = [Arc::clone(&first), Arc::clone(&second)]
        .into_iter()
        .map(|engine| thread::spawn(move || engine.reload().unwrap()))
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_reloaded());
    }

    let a = first.current().unwrap();
    let b = second.current().unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.revision_id(), b.revision_id());
    assert_eq!(*a.blog(), *b.blog());
}

#[test]
fn test_working_dir_shows_uncommitted_content() {
    let repo = starter_repo();
    write(
        repo.path(),
        "content/post/draft.rst",
        "Draft\n=====\n\n.. date: 2999-01-01\n\nNot yet.\n",
    );

    let engine = working_dir_engine(repo.path());
    engine.reload().unwrap();
    assert!(engine.current().unwrap().blog().get("post/draft").is_some());

    // the working directory is always considered stale
    assert!(engine.needs_reload());
    assert!(engine.reload().unwrap().is_reloaded());
    assert_eq!(engine.current().unwrap().generation(), 2);
}

#[test]
fn test_interactive_config() {
    let repo = starter_repo();
    write(
        repo.path(),
        "config.yaml",
        "TITLE: Mine\nGOOGLE_ANALYTICS: UA-1\nREVISION: forged\n",
    );
    commit(repo.path(), "analytics");

    let settings = EngineSettings::builder()
        .repo_path(repo.path())
        .interactive(true)
        .build()
        .unwrap();
    let engine = Engine::new(settings);
    engine.reload().unwrap();

    let snapshot = engine.current().unwrap();
    assert_eq!(snapshot.config().get_str("TITLE"), Some("Mine"));
    assert!(snapshot.config().get("GOOGLE_ANALYTICS").is_none());
    assert!(snapshot.config().get("REVISION").is_none());
    assert_eq!(snapshot.config().get_bool("DISQUS_DEVELOPER"), Some(true));
}

#[test]
fn test_templates() {
    let repo = starter_repo();
    let engine = engine(repo.path());
    engine.reload().unwrap();
    let snapshot = engine.current().unwrap();

    assert_eq!(
        templates::list_templates(&snapshot),
        ["base.html", "post_list.html", "posts.html"]
    );

    let source = templates::get_source(&snapshot, "base.html").unwrap();
    assert_eq!(source.path(), "templates/base.html");
    assert!(!source.text().unwrap().is_empty());
    assert!(source.is_up_to_date());

    assert!(templates::get_source(&snapshot, "missing.html").is_err());
    assert!(templates::get_source(&snapshot, "../config.yaml").is_err());

    write(repo.path(), "templates/base.html", "<html>changed</html>\n");
    commit(repo.path(), "new base");
    assert!(!source.is_up_to_date());
}

#[test]
fn test_assets() {
    let repo = starter_repo();
    let engine = engine(repo.path());
    engine.reload().unwrap();
    let snapshot = engine.current().unwrap();

    let css = assets::static_file(&snapshot, "screen.css").unwrap();
    assert_eq!(css.path(), "static/screen.css");
    assert!(!css.is_empty());
    assert!(css.etag().starts_with("vellum-"));
    assert_eq!(css.etag(), assets::static_file(&snapshot, "screen.css").unwrap().etag());

    let image = assets::attachment(&snapshot, "vellum.png").unwrap();
    assert_eq!(image.path(), "content/attachments/vellum.png");
    assert!(!image.is_empty());
    assert_ne!(image.etag(), css.etag());

    assert!(assets::static_file(&snapshot, "nope.css").is_err());
}

#[test]
fn test_engine_describes_reload_metrics() {
    let repo = starter_repo();
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        let engine = engine(repo.path());
        assert!(engine.reload().unwrap().is_reloaded());
    });

    let rendered = handle.render();
    assert!(rendered.contains("# HELP vellum_reloads_total"));
    assert!(rendered.contains("# HELP vellum_blog_entries"));
    assert!(rendered.contains("vellum_blog_entries 3"));
}
