#![doc = include_str!("../README.md")]

mod composite;
mod digit_group;
mod error;
mod importer;
mod layout;
mod pipeline;
mod reader;
mod shuffle;
mod sink;
mod synth;
mod writer;

pub use crate::composite::*;
pub use crate::digit_group::*;
pub use crate::error::*;
pub use crate::importer::*;
pub use crate::layout::*;
pub use crate::pipeline::*;
pub use crate::reader::*;
pub use crate::shuffle::*;
pub use crate::sink::*;
pub use crate::synth::*;
pub use crate::writer::*;
