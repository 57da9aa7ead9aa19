use simulation::{run_convergence, SimulationConfig};
pub mod simulation;

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            std::process::exit(1);
        }
    };
    rt.block_on(async_main());
}

async fn async_main() {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║            MERGE-ON-READ CONVERGENCE RUNS                  ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let runs = [
        SimulationConfig::new(4, 25),
        SimulationConfig::new(16, 50),
        SimulationConfig::new(32, 100).with_empty_siblings(4),
    ];

    for config in runs {
        match run_convergence(config).await {
            Ok(stats) if stats.converged() => stats.print(),
            Ok(stats) => {
                stats.print();
                tracing::error!("index did not converge");
                std::process::exit(1);
            }
            Err(err) => {
                tracing::error!(error = %err, "convergence run failed");
                std::process::exit(1);
            }
        }
    }

    println!("\n✓ All convergence runs completed successfully!");
}
