use reelconnect_core::{GameConfig, MemoryReelView};

fn main() {
    // One headless round: roll, land, evaluate
    let config = GameConfig::default();
    let mut session = config.session();
    let mut view = MemoryReelView::default();

    let plan = match session.start_spin() {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("spin failed: {e}");
            return;
        }
    };
    view.show_grid(&plan.grid);
    match session.finish_spin(&mut view) {
        Ok(evaluation) => {
            println!(
                "server_seed_hash={} nonce={} evaluate_after={:?}",
                session.server_seed_hash(),
                plan.nonce,
                plan.evaluate_after
            );
            print!("{}", plan.grid);
            for m in &evaluation.matches {
                println!("{} x{} at {:?}", m.symbol, m.count, m.indices);
            }
            println!("Win Amount: {}", evaluation.win_amount);
        }
        Err(e) => eprintln!("evaluation failed: {e}"),
    }
}
