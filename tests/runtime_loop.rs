use std::error::Error;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use pollwatch::engine::{
    relay_interrupts, InterruptOutcome, Runtime, RuntimeOptions, StopReason, WatchCore,
};
use pollwatch::fs::mock::MockFileSystem;
use pollwatch::fs::FileSystem;
use pollwatch::snapshot::ChangeSet;
use pollwatch_test_utils::builders::WatchSpecBuilder;
use pollwatch_test_utils::recording_handler::{RecordingHandler, Reply};
use pollwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const FAST: RuntimeOptions = RuntimeOptions {
    interval: Duration::from_millis(10),
};

fn watched_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/w/a.txt", "a");
    fs
}

fn build_runtime(
    fs: &MockFileSystem,
    handler: RecordingHandler,
) -> Result<(Runtime<RecordingHandler>, mpsc::Sender<()>), Box<dyn Error>> {
    let core = WatchCore::start(fs, WatchSpecBuilder::new().root("/w").build())?;
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let (tx, rx) = mpsc::channel(1);
    Ok((Runtime::new(core, shared, handler, FAST, rx), tx))
}

async fn wait_for_calls(calls: &Arc<Mutex<Vec<ChangeSet>>>, n: usize) {
    while calls.lock().unwrap().len() < n {
        sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn declining_handler_ends_the_loop() -> TestResult {
    init_tracing();

    let fs = watched_fs();
    let handler = RecordingHandler::scripted([Reply::Stop]);
    let calls = handler.calls();
    let (runtime, _tx) = build_runtime(&fs, handler)?;

    let task = tokio::spawn(runtime.run());
    fs.add_file("/w/b.txt", "b");

    let reason = with_timeout(task).await??;
    assert_eq!(reason, StopReason::HandlerDeclined);
    assert_eq!(calls.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn shutdown_interrupts_an_idle_loop() -> TestResult {
    init_tracing();

    let fs = watched_fs();
    let handler = RecordingHandler::new();
    let calls = handler.calls();
    let (runtime, tx) = build_runtime(&fs, handler)?;

    let task = tokio::spawn(runtime.run());
    sleep(Duration::from_millis(30)).await;
    tx.send(()).await?;

    let reason = with_timeout(task).await??;
    assert_eq!(reason, StopReason::Interrupted);
    assert!(calls.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn failing_and_panicking_handlers_do_not_stop_the_loop() -> TestResult {
    init_tracing();

    let fs = watched_fs();
    let handler = RecordingHandler::scripted([Reply::Fail, Reply::Panic, Reply::Stop]);
    let calls = handler.calls();
    let (runtime, _tx) = build_runtime(&fs, handler)?;

    let task = tokio::spawn(runtime.run());

    fs.add_file("/w/b.txt", "b");
    with_timeout(wait_for_calls(&calls, 1)).await;

    fs.add_file("/w/c.txt", "c");
    with_timeout(wait_for_calls(&calls, 2)).await;

    fs.remove("/w/a.txt");
    let reason = with_timeout(task).await??;

    assert_eq!(reason, StopReason::HandlerDeclined);
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].deleted.len(), 1);
    Ok(())
}

#[tokio::test]
async fn dropped_shutdown_sender_does_not_stop_the_loop() -> TestResult {
    init_tracing();

    let fs = watched_fs();
    let handler = RecordingHandler::scripted([Reply::Stop]);
    let (runtime, tx) = build_runtime(&fs, handler)?;
    drop(tx);

    let task = tokio::spawn(runtime.run());
    sleep(Duration::from_millis(30)).await;
    assert!(!task.is_finished());

    fs.add_file("/w/b.txt", "b");
    let reason = with_timeout(task).await??;
    assert_eq!(reason, StopReason::HandlerDeclined);
    Ok(())
}

type InterruptFuture = Pin<Box<dyn Future<Output = io::Result<()>> + Send>>;

/// Interrupt source fed from a channel; resolves once per message and fails
/// once the sending side is gone.
fn scripted_interrupts() -> (mpsc::UnboundedSender<()>, impl FnMut() -> InterruptFuture) {
    let (tx, rx) = mpsc::unbounded_channel::<()>();
    let rx = Arc::new(tokio::sync::Mutex::new(rx));
    let next = move || {
        let rx = Arc::clone(&rx);
        Box::pin(async move {
            rx.lock()
                .await
                .recv()
                .await
                .ok_or_else(|| io::Error::other("interrupt source closed"))
        }) as InterruptFuture
    };
    (tx, next)
}

#[tokio::test]
async fn first_interrupt_requests_shutdown_and_second_forces_exit() -> TestResult {
    init_tracing();

    let (signal_tx, next) = scripted_interrupts();
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
    let relay = tokio::spawn(relay_interrupts(next, shutdown_tx));

    signal_tx.send(())?;
    assert_eq!(with_timeout(shutdown_rx.recv()).await, Some(()));
    assert!(!relay.is_finished());

    signal_tx.send(())?;
    assert_eq!(with_timeout(relay).await?, InterruptOutcome::Forced);
    Ok(())
}

#[tokio::test]
async fn failed_interrupt_listener_leaves_the_loop_running() -> TestResult {
    let (signal_tx, next) = scripted_interrupts();
    drop(signal_tx);

    let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
    let outcome = with_timeout(relay_interrupts(next, shutdown_tx)).await;

    assert_eq!(outcome, InterruptOutcome::ListenerFailed);
    assert_eq!(shutdown_rx.recv().await, None);
    Ok(())
}
