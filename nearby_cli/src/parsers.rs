pub fn parse_search_radius(input: &str) -> Result<f64, String> {
    let radius = input
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid search radius {input}"))?;

    if !radius.is_finite() || radius < 0.0 {
        return Err(format!("Search radius must be a non-negative number, got {input}"));
    }

    Ok(radius)
}
