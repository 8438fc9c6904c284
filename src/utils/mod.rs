mod guardable_stream;

pub use guardable_stream::*;
