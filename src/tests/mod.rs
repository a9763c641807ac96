pub(crate) mod support;

mod generation;
mod pipeline;
