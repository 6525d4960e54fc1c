//! network_status — interfaces, WiFi, external IP, DNS, connections

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;

const EXTERNAL_IP_URL: &str = "https://api.ipify.org";

#[derive(Serialize)]
struct InterfaceEntry {
    name: String,
    ip: String,
    mac: String,
    status: String,
}

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let ifconfig_out = ctx
        .capture("ifconfig", &[])
        .await
        .context("network_status: ifconfig failed")?;
    let interfaces = parse_ifconfig(&ifconfig_out);

    // WiFi association is best-effort: not every machine has en0 WiFi.
    let wifi_network = match ctx
        .capture("networksetup", &["-getairportnetwork", "en0"])
        .await
    {
        Ok(out) => parse_wifi_network(&out),
        Err(_) => None,
    };

    let external_ip = match ctx
        .capture("curl", &["-s", "--max-time", "5", EXTERNAL_IP_URL])
        .await
    {
        Ok(out) => {
            let ip = out.trim().to_string();
            (!ip.is_empty()).then_some(ip)
        }
        Err(_) => None,
    };

    let dns_servers = match ctx.capture("scutil", &["--dns"]).await {
        Ok(out) => parse_dns_servers(&out),
        Err(_) => Vec::new(),
    };

    let established = match ctx.capture("netstat", &["-an", "-p", "tcp"]).await {
        Ok(out) => Some(count_established(&out)),
        Err(_) => None,
    };

    Ok(json!({
        "interfaces": interfaces,
        "wifi_network": wifi_network,
        "external_ip": external_ip,
        "dns_servers": dns_servers,
        "established_connections": established,
    }))
}

/// Parse ifconfig output into one entry per interface.
fn parse_ifconfig(stdout: &str) -> Vec<InterfaceEntry> {
    let mut interfaces = Vec::new();
    let mut current_name = String::new();
    let mut current_ip = String::new();
    let mut current_mac = String::new();
    let mut current_status = String::new();

    for line in stdout.lines() {
        if !line.starts_with('\t') && !line.starts_with(' ') && line.contains(':') {
            if !current_name.is_empty() {
                interfaces.push(InterfaceEntry {
                    name: current_name.clone(),
                    ip: current_ip.clone(),
                    mac: current_mac.clone(),
                    status: current_status.clone(),
                });
            }

            current_name = line.split(':').next().unwrap_or("").trim().to_string();
            current_ip = String::new();
            current_mac = String::new();
            current_status = if line.contains("UP") {
                "up".to_string()
            } else {
                "down".to_string()
            };
        } else {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix("inet ") {
                if let Some(ip) = rest.split_whitespace().next() {
                    current_ip = ip.to_string();
                }
            } else if let Some(rest) = trimmed.strip_prefix("ether ") {
                if let Some(mac) = rest.split_whitespace().next() {
                    current_mac = mac.to_string();
                }
            }
        }
    }

    if !current_name.is_empty() {
        interfaces.push(InterfaceEntry {
            name: current_name,
            ip: current_ip,
            mac: current_mac,
            status: current_status,
        });
    }

    interfaces
}

/// "Current Wi-Fi Network: HomeNet" → Some("HomeNet")
fn parse_wifi_network(stdout: &str) -> Option<String> {
    let line = stdout.trim();
    let name = line.split(':').nth(1)?.trim();
    if name.is_empty() || line.contains("not associated") {
        None
    } else {
        Some(name.to_string())
    }
}

/// Collect "nameserver[N] : addr" lines from scutil --dns, deduplicated
/// in first-seen order.
fn parse_dns_servers(stdout: &str) -> Vec<String> {
    let mut servers: Vec<String> = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if !line.starts_with("nameserver[") {
            continue;
        }
        if let Some(addr) = line.split(':').nth(1) {
            let addr = addr.trim().to_string();
            if !addr.is_empty() && !servers.contains(&addr) {
                servers.push(addr);
            }
        }
    }
    servers
}

fn count_established(netstat: &str) -> usize {
    netstat
        .lines()
        .filter(|l| l.contains("ESTABLISHED"))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IFCONFIG_SAMPLE: &str = "\
lo0: flags=8049<UP,LOOPBACK,RUNNING,MULTICAST> mtu 16384
\tinet 127.0.0.1 netmask 0xff000000
en0: flags=8863<UP,BROADCAST,SMART,RUNNING,SIMPLEX,MULTICAST> mtu 1500
\tether f0:18:98:aa:bb:cc
\tinet 192.168.1.42 netmask 0xffffff00 broadcast 192.168.1.255
awdl0: flags=8802<BROADCAST,SIMPLEX,MULTICAST> mtu 1484
\tether 02:11:22:33:44:55
";

    const SCUTIL_SAMPLE: &str = "\
DNS configuration

resolver #1
  search domain[0] : lan
  nameserver[0] : 192.168.1.1
  nameserver[1] : 1.1.1.1
  if_index : 14 (en0)

resolver #2
  nameserver[0] : 192.168.1.1
";

    #[test]
    fn test_parse_ifconfig() {
        let interfaces = parse_ifconfig(IFCONFIG_SAMPLE);
        assert_eq!(interfaces.len(), 3);
        assert_eq!(interfaces[0].name, "lo0");
        assert_eq!(interfaces[0].ip, "127.0.0.1");
        assert_eq!(interfaces[1].name, "en0");
        assert_eq!(interfaces[1].mac, "f0:18:98:aa:bb:cc");
        assert_eq!(interfaces[1].ip, "192.168.1.42");
        assert_eq!(interfaces[1].status, "up");
        assert_eq!(interfaces[2].status, "down");
    }

    #[test]
    fn test_parse_wifi_network() {
        assert_eq!(
            parse_wifi_network("Current Wi-Fi Network: HomeNet\n"),
            Some("HomeNet".to_string())
        );
        assert_eq!(
            parse_wifi_network("You are not associated with an AirPort network.\n"),
            None
        );
    }

    #[test]
    fn test_parse_dns_servers_dedupes() {
        let servers = parse_dns_servers(SCUTIL_SAMPLE);
        assert_eq!(servers, vec!["192.168.1.1", "1.1.1.1"]);
    }

    #[test]
    fn test_count_established() {
        let sample = "\
tcp4  0  0  192.168.1.42.51044  151.101.1.6.443  ESTABLISHED
tcp4  0  0  192.168.1.42.51045  151.101.1.6.443  TIME_WAIT
tcp4  0  0  192.168.1.42.51046  140.82.112.22.443  ESTABLISHED
";
        assert_eq!(count_established(sample), 2);
    }
}
