//! End-to-end scenarios from spec.md §8, run against a real Redis/Valkey
//! instance. Mirrors the teacher's own `tests/integration/utils.rs` pattern
//! of env-var-gated fixtures rather than a mocked driver — `fred` has no
//! officially supported mock transport, and the translation layers under
//! test (pipeline exec shaping, WITHSCORES flattening, watch-abort-to-null)
//! only mean anything against real server replies.
//!
//! Set `REDIS_COMPAT_TEST_URL` (e.g. `127.0.0.1:6379`) to run these;
//! otherwise each test returns early without failing, the same tolerance
//! the teacher's own harness has for an unreachable `REDIS_HOST`/`REDIS_PORT`.

use fred::interfaces::ClientLike;
use redis_compat::{Client, ClientOptions, Key, Reply, Value as Arg};

fn test_options() -> Option<ClientOptions> {
    let url = std::env::var("REDIS_COMPAT_TEST_URL").ok()?;
    let url = url.strip_prefix("redis://").unwrap_or(&url);
    let (host, port) = url.split_once(':').unwrap_or((url, "6379"));
    Some(ClientOptions { host: Some(host.to_string()), port: port.parse().ok(), lazy_connect: true, ..Default::default() })
}

async fn connected_client() -> Option<Client> {
    let options = test_options()?;
    let client = Client::new(options).ok()?;
    client.driver().connect();
    client.driver().wait_for_connect().await.ok()?;
    Some(client)
}

#[tokio::test]
async fn pipeline_reports_each_entry_independently() {
    let Some(client) = connected_client().await else { return };

    let pipeline = client.pipeline();
    let driver = pipeline.driver();
    redis_compat::commands::strings::set(driver, Key::from("pipeline:a").into(), Arg::from("1"), &[]).await.unwrap();
    redis_compat::commands::keys::del(driver, vec![Key::from("pipeline:missing").into()]).await.unwrap();

    let results = pipeline.exec().await;
    assert_eq!(results.len(), 2);
    assert!(results[0].0.is_none());
    assert_eq!(results[0].1, Reply::Simple("OK".to_string()));
    assert!(results[1].0.is_none());
}

#[tokio::test]
async fn transaction_watch_miss_resolves_to_null() {
    let Some(client) = connected_client().await else { return };

    redis_compat::commands::strings::set(client.driver(), Key::from("tx:watched").into(), Arg::from("1"), &[]).await.unwrap();

    client.watch(vec![Key::from("tx:watched").into()]).await.unwrap();

    // A write landing between WATCH and EXEC dirties the key the same way a
    // concurrent client's write would.
    redis_compat::commands::strings::set(client.driver(), Key::from("tx:watched").into(), Arg::from("2"), &[]).await.unwrap();

    let trx = client.multi();
    redis_compat::commands::strings::get(trx.driver(), Key::from("tx:watched").into()).await.unwrap();
    let result = trx.exec(true).await.unwrap();
    assert_eq!(result, Reply::Null);
}

#[tokio::test]
async fn sorted_set_withscores_flattens_to_member_score_pairs() {
    use redis_compat::commands::sorted_sets;

    let Some(client) = connected_client().await else { return };

    sorted_sets::zadd(
        client.driver(),
        Key::from("zset:withscores").into(),
        &[Arg::from(1.0), Arg::from("a"), Arg::from(2.0), Arg::from("b")],
    )
    .await
    .unwrap();

    let flat = sorted_sets::zrange(client.driver(), Key::from("zset:withscores").into(), 0, -1, true).await.unwrap();
    assert_eq!(
        flat,
        Reply::Array(vec![
            Reply::Bulk("a".into()),
            Reply::Double("1".to_string()),
            Reply::Bulk("b".into()),
            Reply::Double("2".to_string()),
        ])
    );
}

#[tokio::test]
async fn xadd_ids_are_strictly_increasing_and_xrange_round_trips() {
    use redis_compat::commands::streams;

    let Some(client) = connected_client().await else { return };
    let key: fred::types::Key = Key::from("stream:round-trip").into();

    let first = streams::xadd(client.driver(), key.clone(), &[Arg::from("*"), Arg::from("k"), Arg::from("v1")]).await.unwrap();
    let second = streams::xadd(client.driver(), key.clone(), &[Arg::from("*"), Arg::from("k"), Arg::from("v2")]).await.unwrap();
    let Reply::Bulk(first_id) = first else { panic!("expected bulk id") };
    let Reply::Bulk(second_id) = second else { panic!("expected bulk id") };
    assert!(second_id > first_id, "XADD ids must be strictly increasing on the same stream");

    let range = streams::xrange(client.driver(), key, "-".to_string(), "+".to_string(), None).await.unwrap();
    let Reply::Array(entries) = range else { panic!("expected array of entries") };
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn subscribe_then_publish_emits_message_event() {
    let Some(client) = connected_client().await else { return };

    let mut events = client.subscribe_messages();
    client.subscribe(vec!["compat:channel".to_string()]).await.unwrap();

    client.publish("compat:channel", redis_compat::Payload::Text("hello".to_string())).await.unwrap();

    let event = tokio::time::timeout(std::time::Duration::from_secs(5), events.recv()).await.unwrap().unwrap();
    match event {
        redis_compat::PubSubEvent::Message { channel, payload } => {
            assert_eq!(channel, "compat:channel");
            assert_eq!(payload, redis_compat::Payload::Text("hello".to_string()));
        }
        other => panic!("expected Message, got {other:?}"),
    }

    client.unsubscribe(vec!["compat:channel".to_string()]).await.unwrap();
}

#[tokio::test]
async fn define_command_reloads_once_after_script_flush() {
    let Some(client) = connected_client().await else { return };
    let cache = redis_compat::ScriptCache::new();

    cache.define("echoArg", "return ARGV[1]".to_string(), 0);
    let first = cache.call(client.driver(), "echoArg", vec![Arg::from("hello")]).await.unwrap();
    assert_eq!(first, Reply::Bulk("hello".into()));

    redis_compat::commands::raw::custom::<_, ()>(client.driver(), "SCRIPT", vec!["FLUSH".into()]).await.unwrap();

    let second = cache.call(client.driver(), "echoArg", vec![Arg::from("again")]).await.unwrap();
    assert_eq!(second, Reply::Bulk("again".into()));
}
