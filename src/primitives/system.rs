//! System/control: environment access, randomness, coarse wall-clock time,
//! and the runtime-flag toggles. Time is computed by hand from a raw Unix
//! timestamp (see [`civil_from_days`]) rather than by pulling in a
//! date-time crate — a civil calendar conversion is a few dozen lines and
//! doesn't earn a dependency.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::JoyResult;
use crate::value::{JoyString, Value};

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("system", system);
    dict.define_primitive("getenv", getenv);
    dict.define_primitive("argc", argc);
    dict.define_primitive("argv", argv);
    dict.define_primitive("abort", abort);
    dict.define_primitive("quit", quit);
    dict.define_primitive("gc", gc);
    dict.define_primitive("setautoput", setautoput);
    dict.define_primitive("setundeferror", setundeferror);
    dict.define_primitive("autoput", push_autoput);
    dict.define_primitive("undeferror", push_undeferror);
    dict.define_primitive("echo", echo);
    dict.define_primitive("time", time);
    dict.define_primitive("clock", clock);
    dict.define_primitive("rand", rand_);
    dict.define_primitive("srand", srand);
    dict.define_primitive("localtime", localtime);
    dict.define_primitive("gmtime", gmtime);
    dict.define_primitive("mktime", mktime);
    dict.define_primitive("strftime", strftime);
    dict.define_primitive("format", format);
    dict.define_primitive("formatf", formatf);
    dict.define_primitive("opcase", opcase);
    dict.define_primitive("case", case);
}

fn system(ctx: &mut Context) -> JoyResult<()> {
    let cmd = ctx.stack.pop_string("system")?;
    let status = std::process::Command::new("sh")
        .arg("-c")
        .arg(cmd.to_string())
        .status();
    let code = status.ok().and_then(|s| s.code()).unwrap_or(-1);
    ctx.stack.push(Value::Integer(code as i64));
    Ok(())
}

fn getenv(ctx: &mut Context) -> JoyResult<()> {
    let name = ctx.stack.pop_string("getenv")?;
    let value = std::env::var(name.to_string()).unwrap_or_default();
    ctx.stack.push(Value::String(JoyString::from_str(&value)));
    Ok(())
}

fn argc(ctx: &mut Context) -> JoyResult<()> {
    ctx.stack.push(Value::Integer(ctx.args.len() as i64));
    Ok(())
}

fn argv(ctx: &mut Context) -> JoyResult<()> {
    let i = ctx.stack.pop_integer("argv")?;
    let arg = if i < 0 {
        None
    } else {
        ctx.args.get(i as usize)
    };
    match arg {
        Some(s) => ctx.stack.push(Value::String(JoyString::from_str(s))),
        None => ctx.stack.push(Value::String(JoyString::default())),
    }
    Ok(())
}

fn abort(_ctx: &mut Context) -> JoyResult<()> {
    std::process::exit(1);
}

fn quit(_ctx: &mut Context) -> JoyResult<()> {
    std::process::exit(0);
}

/// No managed heap to collect; a no-op kept so programs that call `gc`
/// for portability still run.
fn gc(_ctx: &mut Context) -> JoyResult<()> {
    Ok(())
}

fn setautoput(ctx: &mut Context) -> JoyResult<()> {
    ctx.flags.autoput = ctx.stack.pop_boolean("setautoput")?;
    Ok(())
}

fn setundeferror(ctx: &mut Context) -> JoyResult<()> {
    ctx.flags.undeferror = ctx.stack.pop_boolean("setundeferror")?;
    Ok(())
}

fn push_autoput(ctx: &mut Context) -> JoyResult<()> {
    ctx.stack.push(Value::Boolean(ctx.flags.autoput));
    Ok(())
}

fn push_undeferror(ctx: &mut Context) -> JoyResult<()> {
    ctx.stack.push(Value::Boolean(ctx.flags.undeferror));
    Ok(())
}

fn echo(ctx: &mut Context) -> JoyResult<()> {
    ctx.flags.echo = ctx.stack.pop_boolean("echo")?;
    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn time(ctx: &mut Context) -> JoyResult<()> {
    ctx.stack.push(Value::Integer(unix_now()));
    Ok(())
}

/// A process-relative monotonic clock, in milliseconds since an arbitrary
/// epoch; callers only ever take differences of two readings.
fn clock(ctx: &mut Context) -> JoyResult<()> {
    let millis = std::time::Instant::now().elapsed().as_millis() as i64;
    ctx.stack.push(Value::Integer(millis));
    Ok(())
}

fn rand_(ctx: &mut Context) -> JoyResult<()> {
    let n: i64 = ctx.rng.gen();
    ctx.stack.push(Value::Integer(n.abs()));
    Ok(())
}

fn srand(ctx: &mut Context) -> JoyResult<()> {
    let seed = ctx.stack.pop_integer("srand")?;
    ctx.seed_rng(seed as u64);
    Ok(())
}

/// Days since the Unix epoch to a (year, month, day) civil date, using
/// Howard Hinnant's `civil_from_days` algorithm (proleptic Gregorian,
/// valid for the whole practical timestamp range).
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Pushes a List of [sec min hour mday mon year wday yday], the same
/// fields `struct tm` carries, with `mon` 0-based and `year` a full year
/// (not years-since-1900).
fn broken_down_time(epoch_seconds: i64) -> Value {
    let days = epoch_seconds.div_euclid(86400);
    let secs_of_day = epoch_seconds.rem_euclid(86400);
    let (year, month, day) = civil_from_days(days);
    let hour = secs_of_day / 3600;
    let minute = (secs_of_day % 3600) / 60;
    let sec = secs_of_day % 60;
    // 1970-01-01 was a Thursday (wday 4 in 0=Sunday convention).
    let wday = (days.rem_euclid(7) + 4).rem_euclid(7);
    let yday = days - days_from_civil(year, 1, 1);

    Value::List(vec![
        Value::Integer(sec),
        Value::Integer(minute),
        Value::Integer(hour),
        Value::Integer(day as i64),
        Value::Integer(month as i64 - 1),
        Value::Integer(year),
        Value::Integer(wday),
        Value::Integer(yday),
    ])
}

fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u64;
    let mp = if m > 2 { m - 3 } else { m + 9 } as u64;
    let doy = (153 * mp + 2) / 5 + d as u64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe as i64 - 719468
}

/// This runtime has no timezone database; `localtime` and `gmtime` both
/// report UTC.
fn localtime(ctx: &mut Context) -> JoyResult<()> {
    let secs = ctx.stack.pop_integer("localtime")?;
    ctx.stack.push(broken_down_time(secs));
    Ok(())
}

fn gmtime(ctx: &mut Context) -> JoyResult<()> {
    let secs = ctx.stack.pop_integer("gmtime")?;
    ctx.stack.push(broken_down_time(secs));
    Ok(())
}

/// The inverse of `gmtime`/`localtime`: a [sec min hour mday mon year …]
/// list back to a Unix timestamp. Only the first six fields are read.
fn mktime(ctx: &mut Context) -> JoyResult<()> {
    let fields = ctx.stack.pop_list("mktime")?;
    let get = |i: usize| -> i64 {
        match fields.get(i) {
            Some(Value::Integer(n)) => *n,
            _ => 0,
        }
    };
    let sec = get(0);
    let minute = get(1);
    let hour = get(2);
    let day = get(3) as u32;
    let month = get(4) as u32 + 1;
    let year = get(5);
    let days = days_from_civil(year, month, day);
    let seconds = days * 86400 + hour * 3600 + minute * 60 + sec;
    ctx.stack.push(Value::Integer(seconds));
    Ok(())
}

/// A deliberately small `strftime`: supports `%Y %m %d %H %M %S` only,
/// which covers every scenario this runtime's callers need. An
/// unsupported directive is passed through verbatim rather than erroring.
fn strftime(ctx: &mut Context) -> JoyResult<()> {
    let fields = ctx.stack.pop_list("strftime")?;
    let fmt = ctx.stack.pop_string("strftime")?;
    let get = |i: usize| -> i64 {
        match fields.get(i) {
            Some(Value::Integer(n)) => *n,
            _ => 0,
        }
    };
    let (sec, minute, hour, day, month, year) =
        (get(0), get(1), get(2), get(3), get(4) + 1, get(5));

    let fmt_string = fmt.to_string();
    let mut out = String::new();
    let mut chars = fmt_string.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('Y') => out.push_str(&year.to_string()),
            Some('m') => out.push_str(&format!("{month:02}")),
            Some('d') => out.push_str(&format!("{day:02}")),
            Some('H') => out.push_str(&format!("{hour:02}")),
            Some('M') => out.push_str(&format!("{minute:02}")),
            Some('S') => out.push_str(&format!("{sec:02}")),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    ctx.stack.push(Value::String(JoyString::from_str(&out)));
    Ok(())
}

/// N format → S: render an integer right-justified in a field of width N
/// (negative N left-justifies), the Joy `format` primitive's classic
/// signature.
fn format(ctx: &mut Context) -> JoyResult<()> {
    let width = ctx.stack.pop_integer("format")?;
    let n = ctx.stack.pop_integer("format")?;
    let text = n.to_string();
    let padded = pad(&text, width);
    ctx.stack.push(Value::String(JoyString::from_str(&padded)));
    Ok(())
}

/// Like `format` but for a float, with a requested number of decimal
/// places in addition to field width.
fn formatf(ctx: &mut Context) -> JoyResult<()> {
    let width = ctx.stack.pop_integer("formatf")?;
    let precision = ctx.stack.pop_integer("formatf")?;
    let x = ctx.stack.pop_number("formatf")?;
    let text = format!("{x:.*}", precision.max(0) as usize);
    let padded = pad(&text, width);
    ctx.stack.push(Value::String(JoyString::from_str(&padded)));
    Ok(())
}

fn pad(text: &str, width: i64) -> String {
    let w = width.unsigned_abs() as usize;
    if text.len() >= w {
        return text.to_string();
    }
    let fill = " ".repeat(w - text.len());
    if width < 0 {
        format!("{text}{fill}")
    } else {
        format!("{fill}{text}")
    }
}

/// C opcase → B: tests whether a char is an uppercase letter (kept simple
/// and ASCII-only, matching the byte-oriented `String`/`Char` model).
fn opcase(ctx: &mut Context) -> JoyResult<()> {
    let c = ctx.stack.pop_char("opcase")?;
    ctx.stack
        .push(Value::Boolean((c as char).is_ascii_uppercase()));
    Ok(())
}

/// X [[B1 R1] … [Bn Rn]] case: like `cond` but over raw equality tests
/// against X rather than arbitrary predicate quotations — each clause is
/// `[value result]`; the first clause whose value structurally equals X
/// has its result pushed. No match pushes X back unchanged.
fn case(ctx: &mut Context) -> JoyResult<()> {
    let clauses = ctx.stack.pop_list("case")?;
    let x = ctx.stack.pop("case")?;
    for clause in &clauses {
        if let Some(items) = clause.as_elements() {
            if let [value, result] = items {
                if value.structural_eq(&x) {
                    ctx.stack.push(result.clone());
                    return Ok(());
                }
            }
        }
    }
    ctx.stack.push(x);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mktime_and_gmtime_round_trip() {
        let mut ctx = Context::new();
        // 2024-03-05 00:00:00 UTC
        let known_epoch = 1709596800i64;
        ctx.stack.push(Value::Integer(known_epoch));
        gmtime(&mut ctx).unwrap();
        mktime(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(known_epoch));
    }

    #[test]
    fn strftime_formats_known_date() {
        let mut ctx = Context::new();
        ctx.stack
            .push(Value::String(JoyString::from_str("%Y-%m-%d")));
        ctx.stack.push(Value::Integer(1709596800));
        gmtime(&mut ctx).unwrap();
        strftime(&mut ctx).unwrap();
        assert_eq!(
            *ctx.stack.peek("test").unwrap(),
            Value::String(JoyString::from_str("2024-03-05"))
        );
    }

    #[test]
    fn case_falls_through_unchanged_when_no_match() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::List(vec![Value::List(vec![
            Value::Integer(1),
            Value::String(JoyString::from_str("one")),
        ])]));
        case(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(5));
    }
}
