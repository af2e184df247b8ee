// Sensor side of the gateway: synthetic readings, the serial line codec,
// the sinks a reading is handed to, and the producer worker body.

pub mod frame;
pub mod producer;
pub mod reading;
pub mod serial;
pub mod sink;
