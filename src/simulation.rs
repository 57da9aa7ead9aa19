use async_stream::stream;
use futures::future::join_all;
use futures::stream::{Stream, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sdx_crdt::{decode_map, MapEntry, MapResponse, MapTree};
use sdx_index::{
    IndexError, IndexResolver, MemoryStore, ObjectStore, RObject, ResolverConfig, Sibling,
};
use sdx_query::{Phase, PhaseResults, Report};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BUCKET: &str = "simulation";
const INDEX: &str = "keys_by_writer";

/// Shape of one convergence run
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub writers: usize,
    pub keys_per_writer: usize,
    /// Payload-less siblings injected before the read
    pub empty_siblings: usize,
}

impl SimulationConfig {
    pub fn new(writers: usize, keys_per_writer: usize) -> Self {
        Self {
            writers,
            keys_per_writer,
            empty_siblings: 0,
        }
    }

    pub fn with_empty_siblings(mut self, count: usize) -> Self {
        self.empty_siblings = count;
        self
    }
}

/// Statistics collected during a convergence run
#[derive(Clone, Debug)]
pub struct SimulationStats {
    pub config: SimulationConfig,
    pub siblings_before: usize,
    pub siblings_after: usize,
    pub phase_sizes: Vec<usize>,
    pub write_time: Duration,
    pub read_time: Duration,
    pub summary: MapTree,
}

impl SimulationStats {
    pub fn converged(&self) -> bool {
        self.summary.flag("converged").unwrap_or(false)
    }

    pub fn print(&self) {
        let members = self.summary.counter("members").unwrap_or_default();
        println!("\n╔════════════════════════════════════════════════════════════╗");
        println!("║              Convergence Statistics                        ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║  Writers:                   {:>30} ║", self.config.writers);
        println!("║  Keys per Writer:           {:>30} ║", self.config.keys_per_writer);
        println!("║  Empty Siblings Injected:   {:>30} ║", self.config.empty_siblings);
        println!("║  Siblings Before Read:      {:>30} ║", self.siblings_before);
        println!("║  Siblings After Read:       {:>30} ║", self.siblings_after);
        println!("║  Merged Members:            {:>30} ║", members);
        println!("║  Phase Sizes:               {:>30} ║", format!("{:?}", self.phase_sizes));
        println!(
            "║  Write Time:                {:>29}s ║",
            format!("{:.3}", self.write_time.as_secs_f64())
        );
        println!("║  Read Time:                 {:>28}µs ║", self.read_time.as_micros());
        println!("║  Converged:                 {:>30} ║", self.converged());
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

/// Generator that yields the keys one writer indexes
fn writer_keys(writer: usize, count: usize) -> impl Stream<Item = String> {
    stream! {
        let mut rng = StdRng::from_entropy();
        for i in 0..count {
            let shard: u8 = rng.gen_range(0..8);
            yield format!("w{writer:03}-s{shard}-{i:05}");
        }
    }
}

async fn write_keys(
    resolver: Arc<IndexResolver<MemoryStore>>,
    results: Arc<PhaseResults<String>>,
    writer: usize,
    count: usize,
) -> Result<usize, IndexError> {
    let mut keys = Box::pin(writer_keys(writer, count));
    let mut written = 0;

    while let Some(key) = keys.next().await {
        resolver.put_index(INDEX, key.clone()).await?;
        if let Err(err) = results.add(0, [key]) {
            tracing::warn!(error = %err, "dropping write result");
        }
        written += 1;
    }

    Ok(written)
}

/// Blind writers race on one index, then a single read merges and collapses
/// their siblings.
pub async fn run_convergence(config: SimulationConfig) -> Result<SimulationStats, IndexError> {
    let store = Arc::new(MemoryStore::new());
    let resolver = Arc::new(IndexResolver::new(
        store.clone(),
        ResolverConfig::builder()
            .bucket(BUCKET)
            .sibling_warn_threshold(config.writers * config.keys_per_writer)
            .build(),
    )?);
    let phases = [Phase::map("write").keep(true), Phase::reduce("merge").keep(true)];
    let results = Arc::new(PhaseResults::new(&phases));

    let start = Instant::now();
    let writers = (0..config.writers).map(|writer| {
        tokio::spawn(write_keys(
            resolver.clone(),
            results.clone(),
            writer,
            config.keys_per_writer,
        ))
    });

    let mut written = 0;
    for handle in join_all(writers).await {
        match handle {
            Ok(count) => written += count?,
            Err(err) => tracing::error!(error = %err, "writer task panicked"),
        }
    }

    let placeholder =
        RObject::new(BUCKET, INDEX).with_content(Sibling::empty("application/octet-stream"));
    for _ in 0..config.empty_siblings {
        store.store(&placeholder).await?;
    }
    let write_time = start.elapsed();

    let siblings_before = store.sibling_count(BUCKET, INDEX);
    tracing::info!(writers = config.writers, written, siblings_before, "writers finished");

    let read_start = Instant::now();
    let merged = resolver.get_index(INDEX).await?;
    let read_time = read_start.elapsed();
    let siblings_after = store.sibling_count(BUCKET, INDEX);

    if let Err(err) = results.add(1, merged.iter().cloned()) {
        tracing::warn!(error = %err, "dropping merge result");
    }

    let phase_sizes = match results.report() {
        Report::Nested(per_phase) => per_phase.iter().map(Vec::len).collect(),
        Report::Flat(items) => vec![items.len()],
    };

    let converged = merged.len() == written && siblings_after <= 1;
    if !converged {
        tracing::error!(members = merged.len(), written, siblings_after, "index did not converge");
    }

    let summary = decode_map(&MapResponse::new(vec![
        MapEntry::counter("members", merged.len() as i64),
        MapEntry::counter("siblings_before", siblings_before as i64),
        MapEntry::flag("converged", converged),
        MapEntry::map(
            "timing",
            vec![
                MapEntry::counter("write_ms", write_time.as_millis() as i64),
                MapEntry::counter("read_us", read_time.as_micros() as i64),
            ],
        ),
    ]));

    Ok(SimulationStats {
        config,
        siblings_before,
        siblings_after,
        phase_sizes,
        write_time,
        read_time,
        summary,
    })
}
