extern crate env_logger;
extern crate getopts;
extern crate ip2as;
extern crate ipnet;
#[macro_use]
extern crate log;

use getopts::Options;
use ip2as::address::Network;
use ip2as::builder::build_table;
use ip2as::builder::verify;
use ip2as::builder::BuildOptions;
use ip2as::builder::Check;
use ip2as::error::Result;
use ipnet::Ipv4Net;
use ipnet::Ipv6Net;

use std::env;
use std::process;
use std::str::FromStr;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} --routes FILE --output FILE [options]", program);
    print!("{}", opts.usage(&brief));
}

/* Builds, saves and checks the table; false if a check failed. */
fn run<N: Network>(routes: &str,
                   output: &str,
                   options: &BuildOptions,
                   checks: &[String]) -> Result<bool> {
    let checks = checks.iter()
        .map(|c| Check::<N::Addr>::from_str(c))
        .collect::<Result<Vec<_>>>()?;
    let table = build_table::<N>(routes, options)?;
    table.save(output)?;

    let failures = verify(&table, &checks);
    for (check, found) in failures.iter() {
        error!("{} -> {}, expected {}", check.address, found, check.as_number);
    }
    if failures.is_empty() && !checks.is_empty() {
        info!("New table was verified");
    }
    Ok(failures.is_empty())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("", "routes", "route dump of prefix and AS number lines, optionally gzipped", "FILE");
    opts.optopt("", "output", "ip2as CSV file to write", "FILE");
    opts.optopt("", "family", "address family of the dump, 4 or 6 (default 4)", "FAMILY");
    opts.optopt("", "merge", "older ip2as CSV file used to fill unattributed ranges", "FILE");
    opts.optflag("", "no-collapse", "keep adjacent ranges with the same AS number");
    opts.optmulti("", "check", "expected attribution of an address in the new table", "ADDRESS=ASN");
    opts.optflag("h", "help", "print this help menu");
    let matches = match opts.parse(&args[1..]) {
        Ok(m)  => { m }
        Err(f) => {
            eprintln!("{}", f);
            print_usage(&program, opts);
            process::exit(1);
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, opts);
        return;
    }
    let (routes, output) = match (matches.opt_str("routes"), matches.opt_str("output")) {
        (Some(routes), Some(output)) => (routes, output),
        _ => {
            print_usage(&program, opts);
            process::exit(1);
        }
    };
    let options = BuildOptions {
        merge_with: matches.opt_str("merge"),
        collapse: !matches.opt_present("no-collapse"),
    };
    let checks = matches.opt_strs("check");

    let result = match matches.opt_str("family").as_ref().map(|f| f.as_str()) {
        None | Some("4") => run::<Ipv4Net>(&routes, &output, &options, &checks),
        Some("6") => run::<Ipv6Net>(&routes, &output, &options, &checks),
        Some(other) => {
            error!("Unexpected family: {}", other);
            process::exit(1);
        }
    };
    match result {
        Ok(true) => {},
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
