pub mod chunk;
pub mod deck;
pub mod export;
pub mod pptx;
pub mod processor;
pub mod storage;
pub mod template;

pub use chunk::*;
pub use deck::*;
pub use export::*;
pub use pptx::*;
pub use processor::*;
pub use storage::*;
pub use template::*;
