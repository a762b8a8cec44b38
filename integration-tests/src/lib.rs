#![cfg(test)]

mod common;
mod context;
mod fill_and_break;
mod happy_flow;
mod many_jars;
mod persistence;
mod settlement;
