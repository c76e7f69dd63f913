use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日志
///
/// `RUST_LOG` 优先；否则 `verbose` 为真时输出 debug
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "flashcard_harvest=debug,info"
    } else {
        "flashcard_harvest=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // 测试中可能被重复调用
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}
