pub(crate) mod testing;

#[cfg(test)]
pub(crate) use env::test_env_ext;
