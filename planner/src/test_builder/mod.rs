#![cfg(test)]

mod jar_builder;

pub(crate) use jar_builder::*;
