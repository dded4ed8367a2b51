//! Closes the second moments of a noisy two-compartment system.
//!
//! Run with `RUST_LOG=treering_moments=debug` to watch the completion.

use tracing_subscriber::EnvFilter;
use treering::prelude::*;

fn main() -> Result<(), CompletionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut system = PolynomialSystem::new();
    let x = system.add_state("x")?;
    let y = system.add_state("y")?;
    let z = system.add_state("z")?;
    let w = system.add_disturbance(
        "w",
        Moments::Listed(vec![Coeff::from_integer(0), Coeff::from_integer(1)]),
    )?;
    let s = system.add_disturbance("s", Moments::Bernoulli(Coeff::new(9, 10)))?;

    // x' = x/2 + y/4 + w, y' = s*y, z' = z/3 + w
    let var = Polynomial::var;
    system.define(
        x,
        var(x)
            .scale(&Coeff::new(1, 2))
            .add(&var(y).scale(&Coeff::new(1, 4)))
            .add(&var(w)),
    )?;
    system.define(y, var(s).mul(&var(y)))?;
    system.define(z, var(z).scale(&Coeff::new(1, 3)).add(&var(w)))?;
    system.couple_from_relations();
    system.validate()?;

    for form in [UpdateForm::Reduced, UpdateForm::Unreduced] {
        let basis = system.complete(&[(x, 1), (y, 1), (z, 1)], form, CompletionLimits::default())?;
        println!("{form} basis ({} variables): {}", basis.len(), basis.display(system.symbols()));

        for update in system.update_form(&basis, form)? {
            println!("  {}", update.display(&basis, system.symbols()));
        }
    }

    Ok(())
}
