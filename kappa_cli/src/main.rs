//! # Kappa CLI Application
//!
//! Terminal driver for the slender column check. Prompts for the loads of
//! a 20 x 40 cm column, runs the full analysis and prints a report followed
//! by the JSON result.
//!
//! Set `RUST_LOG=kappa_core=debug` to see solver diagnostics on stderr.

use std::io::{self, BufRead, Write};

use kappa_core::calculations::column::{analyze, AxisDesign, ColumnInput, ColumnReport};
use kappa_core::calculations::demand::DemandKind;
use kappa_core::restraints::Axis;
use kappa_core::section::ReinforcingBar;
use kappa_core::settings::SolverSettings;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn demo_column() -> ColumnInput {
    let mut bars = Vec::new();
    for y in [4.0, 20.0, 36.0] {
        bars.push(ReinforcingBar::new(4.0, y, 16.0));
        bars.push(ReinforcingBar::new(16.0, y, 16.0));
    }

    ColumnInput {
        label: "CLI-Demo".to_string(),
        a_cm: 20.0,
        b_cm: 40.0,
        h_cm: 340.0,
        gamma_c: 1.4,
        gamma_s: 1.15,
        gamma_f: 1.0,
        fck_mpa: 30.0,
        fyk_mpa: 500.0,
        nsk_kn: 540.0,
        msk_tx: -30.0,
        msk_bx: 50.0,
        msk_ty: -10.0,
        msk_by: 48.0,
        restraints: Vec::new(),
        bars,
    }
}

fn main() {
    init_logging();

    println!("Kappa CLI - Slender Column Check");
    println!("================================");
    println!();
    println!("Column 20 x 40 cm, h = 340 cm, C30 / CA-50, 6 bars Ø16");
    println!();

    let mut column = demo_column();
    column.nsk_kn = prompt_f64("Enter Nsk (kN) [540.0]: ", column.nsk_kn);
    column.msk_tx = prompt_f64("Enter Msk,top about x (kN·m) [-30.0]: ", column.msk_tx);
    column.msk_bx = prompt_f64("Enter Msk,base about x (kN·m) [50.0]: ", column.msk_bx);
    column.msk_ty = prompt_f64("Enter Msk,top about y (kN·m) [-10.0]: ", column.msk_ty);
    column.msk_by = prompt_f64("Enter Msk,base about y (kN·m) [48.0]: ", column.msk_by);

    let brace_y = prompt_f64("Restraint height on y axis (cm, 0 = none) [0.0]: ", 0.0);
    if brace_y > 0.0 {
        column.add_restraint(Axis::Y, brace_y);
    }

    println!();
    println!("Sweeping the resistance envelope...");
    println!();

    tracing::info!(label = %column.label, restraints = column.restraints.len(), "running column analysis");
    match analyze(&column, &SolverSettings::default()) {
        Ok(report) => {
            print_report(&column, &report);

            println!();
            println!("JSON Output (for LLM/API use):");
            if let Ok(json) = serde_json::to_string_pretty(&report) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}

fn print_axis(design: &AxisDesign) {
    println!("Bending about {}:", design.axis);
    println!("  le = {:.1} cm, λ = {:.2}, λ1 = {:.2} {}",
        design.effective_length_cm,
        design.lambda,
        design.lambda_limit,
        if design.is_slender() { "(slender)" } else { "" }
    );
    println!("  MA = {:.2}, MB = {:.2} kN·m, α_b = {:.3}", design.ma, design.mb, design.alpha_b);
    println!("  M1d,min = {:.2} kN·m, Md,tot,min = {}", design.m1d_min, moment_or_marker(design.md_tot_min.value()));
    println!("  M2d = {} (κ = {:.2}, {} iterations)",
        moment_or_marker(design.kappa.value()),
        design.kappa.kappa,
        design.kappa.iterations
    );
    for seg in &design.segments {
        println!("    [{:>6.1} → {:>6.1}] Nsd = {:.1} kN, Mbase = {:.2}, Mtop = {:.2}, M2d = {}",
            seg.start_cm,
            seg.end_cm,
            seg.nsd_kn,
            seg.m_base,
            seg.m_top,
            moment_or_marker(seg.m2d)
        );
    }
    println!();
}

fn print_report(column: &ColumnInput, report: &ColumnReport) {
    let design = &report.design;

    println!("═══════════════════════════════════════");
    println!("  COLUMN CHECK RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Section:  {:.0} x {:.0} cm, h = {:.0} cm", column.a_cm, column.b_cm, column.h_cm);
    println!("  Loads:    Nsk = {:.1} kN", column.nsk_kn);
    println!("  Materials: fcd = {:.3} kN/cm², fyd = {:.2} kN/cm²", design.fcd, design.fyd);
    println!();
    println!("Demand:");
    println!("  Nsd = {:.1} kN, ν = {:.3}", design.nsd_kn, design.fa);
    println!();

    print_axis(&design.x);
    print_axis(&design.y);

    for warning in &design.warnings {
        println!("Warning: {}", warning);
    }

    match (&report.envelope, &report.envelope_error) {
        (Some(env), _) => println!("Envelope: {} points, max |MRdX| = {:.2}, max |MRdY| = {:.2} kN·m",
            env.points.len(),
            env.max_abs_mrd_x(),
            env.max_abs_mrd_y()
        ),
        (None, Some(err)) => println!("Envelope: unavailable ({})", err),
        (None, None) => println!("Envelope: no bars"),
    }
    println!();

    println!("Safety Checks:");
    for demand in &report.demands {
        let p = &demand.point;
        println!("  {:>6.1} cm {:<16} Msd,x = {:>8.2}  Msd,y = {:>8.2}  γ = {:>6} {}",
            p.coordinate_cm,
            kind_label(p.kind),
            p.msd_x,
            p.msd_y,
            format_safety(demand.safety),
            status_icon(demand.safety >= 1.0 || demand.safety.is_nan())
        );
    }

    println!();
    println!("═══════════════════════════════════════");
    match report.governing() {
        Some(g) => println!("  RESULT: {} (governs: {} at {:.1} cm, γ = {:.2})",
            if report.passes() { "PASS" } else { "FAIL" },
            kind_label(g.point.kind),
            g.point.coordinate_cm,
            g.safety
        ),
        None => println!("  RESULT: {}", if report.passes() { "PASS" } else { "FAIL" }),
    }
    println!("═══════════════════════════════════════");
}

fn moment_or_marker(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2} kN·m", v),
        None => "did not converge".to_string(),
    }
}

fn format_safety(gamma: f64) -> String {
    if gamma.is_infinite() {
        "∞".to_string()
    } else if gamma.is_nan() {
        "—".to_string()
    } else {
        format!("{:.2}", gamma)
    }
}

fn kind_label(kind: DemandKind) -> &'static str {
    match kind {
        DemandKind::Base => "base",
        DemandKind::Top => "top",
        DemandKind::RestraintAbove => "restraint (sup)",
        DemandKind::RestraintBelow => "restraint (inf)",
        DemandKind::SecondOrder => "M2d",
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
