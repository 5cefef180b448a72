pub mod file_io;

pub mod time;

#[cfg(test)]
mod file_io_test;

#[cfg(test)]
mod time_test;
