use console::Style;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!(
        "{}",
        Style::new().dim().apply_to("─".repeat(title.chars().count()))
    );
}

pub fn print_success(msg: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("SUCCESS:"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("ERROR:"), msg);
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}

pub fn print_hit(rank: usize, source: &str, field: &str, distance: f32, relevant: bool, text: &str) {
    let header = format!("#{} {} / {} (distance {:.4})", rank, source, field, distance);
    let style = if relevant {
        Style::new().bold().blue()
    } else {
        Style::new().bold().dim()
    };
    println!("{}", style.apply_to(header));
    println!("{}", Style::new().dim().apply_to(text.trim()));
    println!();
}

pub fn presence(exists: bool) -> &'static str {
    if exists {
        "present"
    } else {
        "missing"
    }
}
