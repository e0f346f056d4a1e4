/*!
 * Resources Module
 * On-demand resource sampling
 */

pub mod memory;

pub use memory::{
    parse_statm, MemorySample, MemorySampler, OsMemorySampler, SamplerError, SamplerResult,
};
