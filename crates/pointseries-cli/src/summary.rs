use console::Style;
use pointseries_core::export::ExportOutcome;
use pointseries_core::pipeline::config::PipelineConfig;
use pointseries_core::pipeline::PipelineRun;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Point Time Series"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Collection"),
        s.path.apply_to(config.collection.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Variable"),
        s.method.apply_to(&config.variable)
    );
    println!();

    // Query
    println!("  {}", s.header.apply_to("Query"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Geometry"),
        s.value.apply_to(config.geometry())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Dates"),
        s.value
            .apply_to(format!("{} .. {} (end exclusive)", config.start_date, config.end_date))
    );
    match config.cloud_threshold {
        Some(t) => println!(
            "    {:<12}{}",
            s.label.apply_to("Clouds"),
            s.value.apply_to(format!("{} < {t}%", config.cloud_property))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Clouds"),
            s.disabled.apply_to("no filter")
        ),
    }
    println!();

    // Reduction
    println!("  {}", s.header.apply_to("Reduction"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Statistic"),
        s.method.apply_to(config.reduction_spec().statistic)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!("{} m", config.scale))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Max pixels"),
        s.value.apply_to(config.max_pixels)
    );
    if let Ok(spec) = config.derived_spec() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Evaluate"),
            s.method.apply_to(spec.evaluation)
        );
    }
    println!();

    // Export
    println!("  {}", s.header.apply_to("Export"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Target"),
        s.path.apply_to(
            config
                .export
                .root
                .join(&config.export.folder)
                .join(format!("{}.csv", config.export.description))
                .display()
        )
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Order"),
        s.value.apply_to(config.order)
    );
    println!();
}

pub fn print_outcome(run: &PipelineRun, outcome: &ExportOutcome) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Matched"),
        s.value.apply_to(run.matched)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dropped"),
        s.value.apply_to(run.dropped)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rows"),
        s.value.apply_to(run.series.size())
    );
    match outcome {
        ExportOutcome::Written { path, .. } => println!(
            "  {:<14}{}",
            s.label.apply_to("Saved"),
            s.path.apply_to(path.display())
        ),
        ExportOutcome::SkippedEmpty => println!(
            "  {}",
            s.disabled.apply_to(format!(
                "No {} data available for the specified location and time range.",
                run.series.value_column
            ))
        ),
    }
    println!();
}
