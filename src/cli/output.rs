//! CLI output formatting.

use crate::domains::batch::BatchReport;
use crate::domains::optimization::SimulationResult;
use crate::domains::relationships::RelationshipMatrix;
use crate::engine::Simulation;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!("seatsim {} ({})", env!("CARGO_PKG_VERSION"), env!("SEATSIM_GIT_HASH"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"seatsim - greedy seating optimization around a ten-seat table

USAGE:
    seatsim <COMMAND> [OPTIONS]

COMMANDS:
    run                         Optimize one seating from a random start
    batch                       Repeat independent runs and summarize them
    verify                      Check that repeated runs are bit-identical
    matrix                      Print the generated relationship matrix
    help                        Show this help message
    version                     Show version information

OPTIONS:
    --config <FILE>             Load configuration from YAML
    --agents <N>                Seated agents, 1 to 9 (default: 9)
    --close <X>                 Close-seeking weight in [0, 1] (default: 0.7)
    --explore <Y>               Novelty-seeking weight in [0, 1] (default: 0.3)
    --seed <S>                  Master seed (default: 42)
    --max-iterations <M>        Iteration budget (default: 100)
    --preset <P>                balanced | polarized | random (default: balanced)
    --mean <M>                  Balanced-preset mean (default: 0.5)
    --std-dev <S>               Balanced-preset standard deviation (default: 0.2)
    --runs <R>                  Runs for batch (default: 10) or verify (default: 3)
    --threads <T>               Batch worker threads (default: 1)
    --json                      Print JSON instead of tables
    -v, --verbose               Log every executed move

EXAMPLES:
    seatsim run --seed 7
    seatsim run --agents 6 --close 0.9 --explore 0.1
    seatsim batch --runs 100 --threads 4 --preset polarized
    seatsim verify --runs 5
    seatsim matrix --agents 4 --seed 3
"
    );
}

/// Print the command banner.
pub fn print_banner(title: &str) {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║  {title:<61}║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");
}

/// Print a relationship matrix as a grid.
pub fn print_matrix(matrix: &RelationshipMatrix) {
    println!(
        "Relationships ({} agents, mean off-diagonal {:.4}):",
        matrix.num_agents(),
        matrix.mean_off_diagonal()
    );
    println!("{matrix}");
}

/// Print the setup of a simulation before it runs.
pub fn print_setup(sim: &Simulation) {
    let config = sim.config();
    println!("{RULE}");
    println!("Seed:           {}", sim.seed());
    println!("Agents:         {}", config.table.num_agents);
    println!(
        "Desires:        close {:.2}, explore {:.2}",
        sim.desires().close,
        sim.desires().explore
    );
    println!("Preset:         {}", config.relationships.preset);
    println!("Max iterations: {}", config.optimization.max_iterations);
    println!("{RULE}\n");
}

/// Print one optimization result.
pub fn print_result(result: &SimulationResult, verbose: bool) {
    let status = if result.converged {
        "✓ Converged to local optimum"
    } else {
        "✗ Iteration budget exhausted"
    };

    println!("Initial seating:");
    println!("{}", result.initial_state);
    println!("\nFinal seating:");
    println!("{}", result.final_state);

    println!("\n{RULE}");
    println!("{status}");
    println!("{RULE}");
    println!("  Iterations:      {}", result.iterations);
    println!("  Moves:           {}", result.num_moves());
    println!("  Initial utility: {:.6}", result.initial_utility());
    println!("  Final utility:   {:.6}", result.final_utility());
    println!("  Improvement:     {:+.6}", result.improvement());

    if verbose && !result.moves.is_empty() {
        println!("\nMoves:");
        for mv in &result.moves {
            println!(
                "  [{:>3}] agent {} : seat {:>2} → {:>2}  gain {:+.6}",
                mv.iteration, mv.agent, mv.from_seat, mv.to_seat, mv.gain
            );
        }
    }
}

/// Print a batch summary, and every run when `verbose`.
pub fn print_batch_report(report: &BatchReport, verbose: bool) {
    let s = &report.summary;

    if verbose {
        println!("  run        seed  conv  iters  moves     initial       final");
        for run in &report.runs {
            let r = &run.result;
            println!(
                "  {:>3} {:>11}  {:>4}  {:>5}  {:>5}  {:>10.4}  {:>10.4}",
                run.index,
                run.seed,
                if r.converged { "yes" } else { "no" },
                r.iterations,
                r.num_moves(),
                r.initial_utility(),
                r.final_utility()
            );
        }
        println!();
    }

    println!("{RULE}");
    println!("Batch summary ({} runs)", s.runs);
    println!("{RULE}");
    println!(
        "  Converged:        {}/{} ({:.1}%)",
        s.converged,
        s.runs,
        s.convergence_rate * 100.0
    );
    println!(
        "  Initial utility:  {:.4} ± {:.4}",
        s.initial_utility.mean, s.initial_utility.std_dev
    );
    println!(
        "  Final utility:    {:.4} ± {:.4}  [min {:.4}, max {:.4}]",
        s.final_utility.mean, s.final_utility.std_dev, s.final_utility.min, s.final_utility.max
    );
    println!(
        "  Improvement:      {:.4} ± {:.4}",
        s.improvement.mean, s.improvement.std_dev
    );
    println!("  Mean iterations:  {:.2}", s.mean_iterations);
    println!("  Mean moves:       {:.2}", s.mean_moves);
}

/// Print the outcome of a reproducibility check.
pub fn print_verification(digests: &[String], identical: bool) {
    println!("Runs: {}", digests.len());
    if let Some(reference) = digests.first() {
        println!("Reference hash: {reference}");
    }
    println!("{RULE}");
    if identical {
        println!("✓ All {} runs produced identical results", digests.len());
    } else {
        println!("✗ Runs diverged:");
        for (i, digest) in digests.iter().enumerate() {
            println!("  run {i}: {digest}");
        }
    }
    println!("{RULE}");
}
