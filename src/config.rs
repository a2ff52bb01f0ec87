use std::collections::HashMap;
use std::env;

use crate::packets::TTAddress;

const DEFAULT_BROKER: &str = "localhost:1883";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub gateway_address: TTAddress,
    pub broker_host: String,
    pub broker_port: u16,
    pub database_url: String,
    /// Node address -> human readable name, used in logs and archive rows
    pub nodes: HashMap<u32, String>,
}

fn parse_address(raw: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let trimmed = raw.trim().trim_start_matches("0x");
    u32::from_str_radix(trimmed, 16).map_err(|e| format!("invalid address '{}': {}", raw, e).into())
}

/// Parse the TT_NODES list of <hexaddr>=<name> pairs
fn parse_nodes(raw: &str) -> Result<HashMap<u32, String>, Box<dyn std::error::Error>> {
    let mut nodes = HashMap::new();
    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (address, name) = pair
            .split_once('=')
            .ok_or_else(|| format!("malformed TT_NODES entry '{}'", pair))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("empty node name in TT_NODES entry '{}'", pair).into());
        }
        nodes.insert(parse_address(address)?, name.to_string());
    }
    Ok(nodes)
}

impl GatewayConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL environment variable not set")?;

        let gateway_address = TTAddress(parse_address(
            &env::var("GATEWAY_ADDRESS")
                .map_err(|_| "GATEWAY_ADDRESS environment variable not set")?,
        )?);

        let broker = env::var("MQTT_BROKER").unwrap_or_else(|_| DEFAULT_BROKER.to_string());
        let (broker_host, broker_port) = match broker.split_once(':') {
            Some((host, port)) => (
                host.to_string(),
                port.parse::<u16>()
                    .map_err(|e| format!("invalid MQTT_BROKER port '{}': {}", port, e))?,
            ),
            None => (broker, 1883),
        };

        let nodes = match env::var("TT_NODES") {
            Ok(tt_nodes) => parse_nodes(&tt_nodes)?,
            Err(_) => HashMap::new(),
        };

        if nodes.is_empty() {
            return Err(
                "No TreeTalker nodes configured. Please set TT_NODES=<hexaddr>=<name>,..".into(),
            );
        }

        Ok(GatewayConfig {
            gateway_address,
            broker_host,
            broker_port,
            database_url,
            nodes,
        })
    }

    /// Name of a node for logs and archive rows, "Unknown" when unconfigured
    pub fn node_name(&self, address: TTAddress) -> String {
        self.nodes
            .get(&address.0)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed_hex() {
        assert_eq!(parse_address("c2030118").unwrap(), 0xc2030118);
        assert_eq!(parse_address(" 0x52030152 ").unwrap(), 0x52030152);
    }

    #[test]
    fn rejects_garbage_address() {
        assert!(parse_address("not-hex").is_err());
    }

    #[test]
    fn parses_node_list() {
        let nodes = parse_nodes("c2030118=Birch, 0x52030152=Oak,").unwrap();
        assert_eq!(nodes.get(&0xc2030118), Some(&"Birch".to_string()));
        assert_eq!(nodes.get(&0x52030152), Some(&"Oak".to_string()));
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn rejects_node_entry_without_separator() {
        assert!(parse_nodes("c2030118").is_err());
    }

    #[test]
    fn rejects_node_entry_with_empty_name() {
        assert!(parse_nodes("c2030118=").is_err());
        assert!(parse_nodes("c2030118=Birch,52030152=  ").is_err());
    }
}
