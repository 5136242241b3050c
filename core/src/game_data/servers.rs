//! Server code lookup.

use clanboard_types::Server;
use phf::phf_map;

/// Accepted spellings of each server, lower-case
pub static SERVER_CODES: phf::Map<&'static str, Server> = phf_map! {
    "jp" => Server::Jp,
    "japan" => Server::Jp,
    "tw" => Server::Tw,
    "taiwan" => Server::Tw,
    "cn" => Server::Cn,
    "china" => Server::Cn,
    "bilibili" => Server::Cn,
    "kr" => Server::Kr,
    "korea" => Server::Kr,
};

/// Parse a server name, ignoring case and surrounding whitespace
pub fn parse_server(name: &str) -> Option<Server> {
    SERVER_CODES.get(name.trim().to_ascii_lowercase().as_str()).copied()
}
