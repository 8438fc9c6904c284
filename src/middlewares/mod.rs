pub mod trace_id;
