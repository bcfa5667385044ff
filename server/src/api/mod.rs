pub mod dto;
pub mod servers;
