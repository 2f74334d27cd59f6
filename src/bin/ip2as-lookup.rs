extern crate csv;
extern crate env_logger;
extern crate getopts;
extern crate ip2as;
#[macro_use]
extern crate log;

use getopts::Options;
use ip2as::aggregate::AggregateResolver;
use ip2as::asname::AsNames;
use ip2as::context::Ip2As;

use std::env;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::process;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options] [ADDRESS|ASnnn ...]", program);
    print!("{}", opts.usage(&brief));
}

fn answer<W: Write>(writer: &mut csv::Writer<W>,
                    value: &str,
                    context: &Ip2As,
                    names: &AsNames,
                    aggregates: Option<&AggregateResolver>) {
    if let Err(e) = context.answer(writer, value, names, aggregates) {
        error!("Cannot write answer: {}", e);
        process::exit(1);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("", "ipv4", "ip2as CSV file for IPv4 addresses", "FILE");
    opts.optopt("", "ipv6", "ip2as CSV file for IPv6 addresses", "FILE");
    opts.optopt("", "names", "AS name registry dump", "FILE");
    opts.optflag("", "aggregate", "report the aggregate AS of multi-AS operators");
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
    let ipv4_file = matches.opt_str("ipv4");
    let ipv6_file = matches.opt_str("ipv6");
    if ipv4_file.is_none() && ipv6_file.is_none() {
        print_usage(&program, opts);
        process::exit(1);
    }

    let context = match Ip2As::from_files(ipv4_file.as_ref().map(|s| s.as_str()),
                                          ipv6_file.as_ref().map(|s| s.as_str())) {
        Ok(context) => context,
        Err(e) => {
            error!("Could not load tables: {}", e);
            process::exit(1);
        }
    };
    let names = match matches.opt_str("names") {
        Some(path) => match AsNames::load(&path) {
            Ok(names) => names,
            Err(e) => {
                error!("Could not load names: {}", e);
                process::exit(1);
            }
        },
        None => AsNames::new(),
    };
    let resolver = AggregateResolver::new();
    let aggregates = match matches.opt_present("aggregate") {
        true => Some(&resolver),
        false => None,
    };

    let mut writer = csv::Writer::from_writer(io::stdout());
    if !matches.free.is_empty() {
        for value in matches.free.iter() {
            answer(&mut writer, value, &context, &names, aggregates);
        }
        return;
    }
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                if !line.trim().is_empty() {
                    answer(&mut writer, &line, &context, &names, aggregates);
                }
            },
            Err(e) => {
                error!("Cannot read input: {}", e);
                process::exit(1);
            }
        }
    }
}
