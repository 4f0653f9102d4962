use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use triangle_demos::scenes::StaticTriangle;
use triangle_demos::wl_window::RenderingContext;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let scene = Box::new(StaticTriangle::new());
    let mut context = RenderingContext::new("Hello, Triangle!", scene)?;
    context.run()
}
