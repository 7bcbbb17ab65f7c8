use clap::{Parser, Subcommand};

use cadence_core::{
    co, handler, resolve, val_to_json, Coroutine, CoroutineStep, Future, FutureState, Launched,
    Scheduler, Val,
};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Futures engine demonstrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the deferral ordering of chained reactions
    Ordering,
    /// Drive a two-step coroutine that sums two deferred numbers
    Sum,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ordering => ordering(),
        Commands::Sum => sum()?,
    }

    Ok(())
}

/// Adopting a future costs extra queue turns: the handler on `outer` runs
/// after the plain chain has already advanced several steps.
fn ordering() {
    let scheduler = Scheduler::new();

    println!("begin");

    let inner = resolve(&scheduler, Val::Str("adopted".to_string()));
    let outer = Future::new(&scheduler, |resolver, _| {
        resolver.resolve(Val::Future(inner));
        Ok(())
    });
    outer.then(
        Some(handler(|value| {
            println!("{value:?}");
            Ok(Val::Null)
        })),
        None,
    );

    let mut chain = resolve(&scheduler, Val::Null);
    for step in 1..=4 {
        chain = chain.then(
            Some(handler(move |_| {
                println!("{step}");
                Ok(Val::Null)
            })),
            None,
        );
    }

    scheduler.run_until_idle();
}

struct SumTwo {
    scheduler: Scheduler,
    state: u8,
    first: f64,
}

impl Coroutine for SumTwo {
    fn resume(&mut self, value: Val) -> Result<CoroutineStep, Val> {
        match self.state {
            0 => {
                self.state = 1;
                let step = resolve(&self.scheduler, Val::Num(1.0));
                Ok(CoroutineStep::Yielded(Val::Future(step)))
            }
            1 => {
                if let Val::Num(n) = value {
                    self.first = n;
                }
                self.state = 2;
                let step = resolve(&self.scheduler, Val::Num(2.0));
                Ok(CoroutineStep::Yielded(Val::Future(step)))
            }
            _ => {
                let second = if let Val::Num(n) = value { n } else { 0.0 };
                Ok(CoroutineStep::Done(Val::Num(self.first + second)))
            }
        }
    }

    fn throw_into(&mut self, error: Val) -> Result<CoroutineStep, Val> {
        Err(error)
    }
}

fn sum() -> anyhow::Result<()> {
    let scheduler = Scheduler::new();
    let total = co(
        &scheduler,
        Launched::Coroutine(Box::new(SumTwo {
            scheduler: scheduler.clone(),
            state: 0,
            first: 0.0,
        })),
    );

    scheduler.run_until_idle();

    match total.state() {
        FutureState::Fulfilled(value) => println!("{}", val_to_json(&value)?),
        other => println!("{other:?}"),
    }

    Ok(())
}
