mod helpers;
mod test_discovery;
mod test_threads;
