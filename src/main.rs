use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nomad_ai::api::{create_router, AppState};
use nomad_ai::application::{
    AnswerGenerator, BotEngine, IngestService, Reranker, Retriever, ToxicityGate,
};
use nomad_ai::domain::ports::{SessionStore, VectorIndex};
use nomad_ai::infrastructure::{
    build_llm, AppConfig, HfToxicityClassifier, HttpCrossEncoder, InMemorySessionStore,
    InMemoryVectorIndex, OpenAiEmbedding, QdrantVectorIndex, RedisSessionStore, TripCatalog,
    TripLookupTool,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,nomad_ai=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::load()?);
    let cfg = &config.config;

    let embedding = Arc::new(OpenAiEmbedding::from_config(&cfg.embedding));

    let (faq_index, trip_index): (Arc<dyn VectorIndex>, Arc<dyn VectorIndex>) =
        match cfg.vector_store.backend.as_str() {
            "memory" => (
                Arc::new(InMemoryVectorIndex::new(&cfg.vector_store.faq_collection)),
                Arc::new(InMemoryVectorIndex::new(&cfg.vector_store.trip_collection)),
            ),
            "qdrant" => (
                Arc::new(
                    QdrantVectorIndex::new(
                        &cfg.vector_store.qdrant_url,
                        &cfg.vector_store.faq_collection,
                        cfg.embedding.dimension,
                    )
                    .await?,
                ),
                Arc::new(
                    QdrantVectorIndex::new(
                        &cfg.vector_store.qdrant_url,
                        &cfg.vector_store.trip_collection,
                        cfg.embedding.dimension,
                    )
                    .await?,
                ),
            ),
            other => anyhow::bail!("unknown vector store backend: {other}"),
        };

    // Ingestion completes before the server starts taking queries; the
    // indexes are read-only from then on.
    let ingest = IngestService::new(embedding.clone(), faq_index.clone(), trip_index.clone());
    let faq_records = IngestService::load_faq_file(&cfg.data.faq_path)?;
    let trip_records = IngestService::load_trip_file(&cfg.data.trips_path)?;
    let faq_report = ingest.ingest_faq(&faq_records).await?;
    let trip_report = ingest.ingest_trips(&trip_records).await?;
    info!(
        faq = faq_report.ingested,
        trips = trip_report.ingested,
        quarantined = faq_report.quarantined + trip_report.quarantined,
        "collections ready"
    );

    let catalog = Arc::new(TripCatalog::load(&cfg.data.trips_path)?);
    let tool = cfg
        .tools
        .trip_lookup
        .enabled
        .then(|| TripLookupTool::from_config(catalog.clone(), cfg.tools.trip_lookup.clone()));
    let llm = build_llm(&cfg.llm, tool)?;

    let gate = match HfToxicityClassifier::load(&cfg.toxicity) {
        Ok(classifier) => ToxicityGate::new(Arc::new(classifier), cfg.toxicity.threshold),
        Err(e) => {
            warn!(error = %e, "toxicity classifier unavailable, gate disabled");
            ToxicityGate::disabled(cfg.toxicity.threshold)
        }
    };

    let retriever = Retriever::new(
        embedding,
        faq_index,
        trip_index,
        cfg.retrieval.per_collection,
    );
    let reranker = Reranker::new(
        Arc::new(HttpCrossEncoder::new(&cfg.rerank)?),
        cfg.rerank.top_k,
        cfg.rerank.min_score,
    );
    let generator = AnswerGenerator::new(llm, config.prompts.system_template.clone())
        .with_timeout(Duration::from_secs(cfg.llm.timeout_seconds));

    let engine = Arc::new(BotEngine::new(
        gate,
        retriever,
        reranker,
        generator,
        config.prompts.safety_message.clone(),
    ));

    let sessions: Arc<dyn SessionStore> = match cfg.sessions.backend.as_str() {
        "memory" => Arc::new(InMemorySessionStore::new()),
        "redis" => {
            let redis_url =
                std::env::var("REDIS_URL").unwrap_or_else(|_| cfg.sessions.redis_url.clone());
            Arc::new(RedisSessionStore::new(&redis_url)?)
        }
        other => anyhow::bail!("unknown session store backend: {other}"),
    };

    let state = AppState::new(engine, sessions, config.clone());
    let app = create_router(state);

    let addr = SocketAddr::new(cfg.server.host.parse()?, cfg.server.port);
    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
