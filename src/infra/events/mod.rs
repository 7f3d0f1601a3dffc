pub mod broadcast_sink;
