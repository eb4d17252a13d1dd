mod alias;
mod chunker;
mod document;
mod emitter;

pub use alias::{escape_attribute, AliasRule, AliasTable};
pub use chunker::{
    chunk_entries, ChunkConfig, SsmlChunker,
    DEFAULT_MAX_BYTES, DEFAULT_MAX_PAUSE_SECONDS, DEFAULT_MIN_GAP_MS, DEFAULT_RATE,
};
pub use document::{SsmlDocument, SsmlFrame, SsmlUnit};
pub use emitter::{LocalFs, OutputFs, OutputPlan, OutputTarget, PlannedFile, SsmlEmitter};
