pub mod aggregator;
pub mod collection;
pub mod config;
pub mod pipeline;
pub mod placer;
pub mod retriever;
pub mod testing;

pub(crate) mod process;

pub use aggregator::{
    AggregationJob, AggregationResult, Aggregator, AggregatorConfig, AggregatorError,
    CommandAggregator,
};
pub use collection::{CollectionId, InvalidCollectionId};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    StorageConfig,
};
pub use pipeline::{CollectionLocks, PipelineError, PipelineRunner, RunReport, StageSet};
pub use placer::{dir_size, FsPlacer, PlacerConfig, PlacerError, PromotionJob, PromotionResult};
pub use retriever::{
    CommandRetriever, RetrievalJob, RetrievalResult, Retriever, RetrieverConfig, RetrieverError,
};
