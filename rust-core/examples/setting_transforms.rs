/// Walk through the main operations of the symmetry engine.
///
/// Generates a space group from its Hall symbol, classifies the operators,
/// moves the group into another setting and identifies the result.
use symmetry_engine::groups::{ExpansionOptions, OperatorSet};
use symmetry_engine::prelude::*;
use symmetry_engine::settings::lookup;

fn main() -> anyhow::Result<()> {
    println!("=== Space group P 1 21/c 1 ===\n");

    // Example 1: catalog lookup and generation
    let setting = lookup("HM:P 1 21/c 1")?;
    println!("1. {} (Hall symbol {})", setting.id(), setting.hall());
    let set = setting.operators()?;
    for op in set {
        println!("   {:<20} {}", op.xyz(), op.classify()?);
    }

    // Example 2: a single operator
    println!("\n2. Classifying a 3_1 screw:");
    let screw: SymmetryOperator = "-y,x-y,z+1/3".parse()?;
    let classified = screw.classify()?;
    println!("   {}", classified);
    println!("   screw index: {:?}", classified.screw_index());

    // Example 3: change of setting
    println!("\n3. Moving to the c-unique setting:");
    let basis: BasisChange = "c,a,b".parse()?;
    let moved = set.transformed(&basis)?;
    println!(
        "   {} operators, identified as {}",
        moved.len(),
        moved.table_id().unwrap_or("nothing")
    );
    print!("{}", moved);

    // Example 4: primitive cell of a centered group
    println!("\n4. Primitive cell of F m -3 m:");
    let fm3m = OperatorSet::from_key("225")?;
    let to_primitive: BasisChange = "1/2b+1/2c,1/2a+1/2c,1/2a+1/2b".parse()?;
    let primitive = fm3m.transformed(&to_primitive)?;
    println!(
        "   {} -> {} operators, lattice {:?}",
        fm3m.len(),
        primitive.len(),
        primitive.lattice()
    );

    // Example 5: screw and glide images in the neighbouring cells
    println!("\n5. Additional elements of P n m a within the unit cell:");
    let pnma = OperatorSet::from_key("Pnma")?;
    for op in pnma.expanded(&ExpansionOptions::default()) {
        println!("   {:<24} {}", op.xyz(), op.classify()?);
    }

    Ok(())
}
