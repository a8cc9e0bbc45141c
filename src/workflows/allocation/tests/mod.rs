mod common;
mod grouping;
