/// Split a newline-separated list of addresses, trimming each line and
/// dropping blank ones. Order and duplicates are preserved.
pub fn parse_addresses(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
