//! Model watcher reload behaviour.

use std::time::Duration;

use directive_synth::config::watcher::ModelWatcher;

mod common;

const RELOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn test_watcher_publishes_new_snapshot() {
    let (_dir, path) = common::write_model("model.toml", &common::toml_model("before.example.com"));

    let (watcher, mut updates) = ModelWatcher::new(&path);
    let _handle = watcher.run().unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(&path, common::toml_model("after.example.com")).unwrap();

    let model = tokio::time::timeout(RELOAD_TIMEOUT, async {
        loop {
            match updates.recv().await {
                Some(model)
                    if model
                        .servers
                        .first()
                        .is_some_and(|s| s.hostname == "after.example.com") =>
                {
                    break model
                }
                Some(_) => continue,
                None => panic!("watcher channel closed"),
            }
        }
    })
    .await
    .expect("reload within timeout");

    assert_eq!(model.servers.len(), 1);
}

#[tokio::test]
async fn test_watcher_survives_invalid_snapshot() {
    let (_dir, path) = common::write_model("model.toml", &common::toml_model("keep.example.com"));

    let (watcher, mut updates) = ModelWatcher::new(&path);
    let _handle = watcher.run().unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(&path, "[[servers]]\nhostname = 42\n").unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    std::fs::write(&path, common::toml_model("fixed.example.com")).unwrap();

    let model = tokio::time::timeout(RELOAD_TIMEOUT, async {
        loop {
            match updates.recv().await {
                Some(model)
                    if model
                        .servers
                        .first()
                        .is_some_and(|s| s.hostname == "fixed.example.com") =>
                {
                    break model
                }
                Some(_) => continue,
                None => panic!("watcher channel closed"),
            }
        }
    })
    .await
    .expect("reload after a bad write");

    assert_eq!(model.backends[0].name, "web-80");
}
