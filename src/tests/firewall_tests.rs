use super::{
    allow_request, deny_request, disable_request, enable_request, parse_status, valid_port_spec,
};

const UFW_STATUS: &str = "\
Status: active

To                         Action      From
--                         ------      ----
22/tcp                     ALLOW       Anywhere
80,443/tcp                 ALLOW       Anywhere
3306                       DENY        192.168.1.0/24
22/tcp (v6)                ALLOW       Anywhere (v6)
Anywhere                   ALLOW IN    10.0.0.5
";

#[test]
fn parses_active_status_and_rules() {
    let status = parse_status(UFW_STATUS);
    assert!(status.active);
    assert_eq!(status.rules.len(), 5);
    assert_eq!(status.rules[0].to, "22/tcp");
    assert_eq!(status.rules[0].action, "ALLOW");
    assert_eq!(status.rules[0].from, "Anywhere");
    assert_eq!(status.rules[2].from, "192.168.1.0/24");
}

#[test]
fn cells_with_spaces_survive_the_split() {
    let status = parse_status(UFW_STATUS);
    assert_eq!(status.rules[3].to, "22/tcp (v6)");
    assert_eq!(status.rules[3].from, "Anywhere (v6)");
}

#[test]
fn directional_actions_keep_their_suffix() {
    let status = parse_status(UFW_STATUS);
    assert_eq!(status.rules[4].action, "ALLOW IN");
    assert_eq!(status.rules[4].from, "10.0.0.5");
}

#[test]
fn inactive_firewall_has_no_rules() {
    let status = parse_status("Status: inactive\n");
    assert!(!status.active);
    assert!(status.rules.is_empty());
}

#[test]
fn rule_requests_quote_the_spec() {
    assert_eq!(allow_request("8080/tcp").command, "ufw allow 8080/tcp");
    assert_eq!(deny_request("evil spec").command, "ufw deny 'evil spec'");
}

#[test]
fn enable_is_forced_and_disable_is_not() {
    assert_eq!(enable_request().command, "ufw --force enable");
    assert_eq!(disable_request().command, "ufw disable");
}

#[test]
fn port_specs_are_validated() {
    assert!(valid_port_spec("22"));
    assert!(valid_port_spec("8080/tcp"));
    assert!(valid_port_spec("443/udp"));
    assert!(!valid_port_spec("0"));
    assert!(!valid_port_spec("22/icmp"));
    assert!(!valid_port_spec("ssh"));
    assert!(!valid_port_spec("70000"));
}
