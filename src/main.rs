#![deny(unused_must_use)]

fn main() -> anyhow::Result<()> {
    newtab_lib::main()
}
