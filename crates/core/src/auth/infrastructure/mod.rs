pub mod in_memory_auth_gate;
