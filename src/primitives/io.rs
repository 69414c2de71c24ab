//! I/O: console printing and the file-handle operators. `Value::File` is a
//! handle into `Context::files`; opening/closing/reading/writing all route
//! through that registry rather than touching `std::fs` directly here.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::JoyResult;
use crate::value::{JoyString, Value};

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("put", put);
    dict.define_primitive("putln", putln);
    dict.define_primitive(".", print_dot);
    dict.define_primitive("putch", putch);
    dict.define_primitive("putchars", putchars);
    dict.define_primitive("newline", newline);

    dict.define_primitive("stdin", push_stdin);
    dict.define_primitive("stdout", push_stdout);
    dict.define_primitive("stderr", push_stderr);

    dict.define_primitive("fopen", fopen);
    dict.define_primitive("fclose", fclose);
    dict.define_primitive("fflush", fflush);
    dict.define_primitive("feof", feof);
    dict.define_primitive("ferror", ferror);
    dict.define_primitive("fgetch", fgetch);
    dict.define_primitive("fgets", fgets);
    dict.define_primitive("fread", fread);
    dict.define_primitive("fput", fput);
    dict.define_primitive("fputch", fputch);
    dict.define_primitive("fputchars", fputchars);
    dict.define_primitive("fputstring", fputstring);
    dict.define_primitive("fwrite", fwrite);
    dict.define_primitive("fseek", fseek);
    dict.define_primitive("ftell", ftell);
    dict.define_primitive("fremove", fremove);
    dict.define_primitive("frename", frename);
}

fn put(ctx: &mut Context) -> JoyResult<()> {
    let v = ctx.stack.pop("put")?;
    let handle = ctx.files.stdout();
    ctx.files.write_bytes("put", handle, v.to_string().as_bytes())
}

fn putln(ctx: &mut Context) -> JoyResult<()> {
    let v = ctx.stack.pop("putln")?;
    let handle = ctx.files.stdout();
    let mut text = v.to_string();
    text.push('\n');
    ctx.files.write_bytes("putln", handle, text.as_bytes())
}

/// `.` is `putln`'s terse alias in the original language.
fn print_dot(ctx: &mut Context) -> JoyResult<()> {
    putln(ctx)
}

fn putch(ctx: &mut Context) -> JoyResult<()> {
    let byte = match ctx.stack.pop("putch")? {
        Value::Char(c) => c,
        Value::Integer(n) => n as u8,
        other => {
            return Err(crate::error::JoyError::type_mismatch(
                "putch",
                "char or integer",
                other.kind(),
            ))
        }
    };
    let handle = ctx.files.stdout();
    ctx.files.write_bytes("putch", handle, &[byte])
}

fn putchars(ctx: &mut Context) -> JoyResult<()> {
    let s = ctx.stack.pop_string("putchars")?;
    let handle = ctx.files.stdout();
    ctx.files.write_bytes("putchars", handle, &s.0)
}

fn newline(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.files.stdout();
    ctx.files.write_bytes("newline", handle, b"\n")
}

fn push_stdin(ctx: &mut Context) -> JoyResult<()> {
    let h = ctx.files.stdin();
    ctx.stack.push(Value::File(h));
    Ok(())
}

fn push_stdout(ctx: &mut Context) -> JoyResult<()> {
    let h = ctx.files.stdout();
    ctx.stack.push(Value::File(h));
    Ok(())
}

fn push_stderr(ctx: &mut Context) -> JoyResult<()> {
    let h = ctx.files.stderr();
    ctx.stack.push(Value::File(h));
    Ok(())
}

fn fopen(ctx: &mut Context) -> JoyResult<()> {
    let mode = ctx.stack.pop_string("fopen")?;
    let path = ctx.stack.pop_string("fopen")?;
    let append = mode.to_string().contains('a');
    let handle = ctx
        .files
        .open(&path.to_string(), append)
        .map_err(|e| crate::error::JoyError::domain("fopen", e.to_string()))?;
    ctx.stack.push(Value::File(handle));
    Ok(())
}

fn fclose(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("fclose")?;
    ctx.files.close(handle)
}

fn fflush(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("fflush")?;
    ctx.files.flush("fflush", handle)
}

/// These two are left as cheap stand-ins for libc's `feof`/`ferror`: this
/// crate does not track end-of-stream or last-error state per handle, so
/// both simply report "no error condition observed" (false).
fn feof(ctx: &mut Context) -> JoyResult<()> {
    ctx.stack.pop_file("feof")?;
    ctx.stack.push(Value::Boolean(false));
    Ok(())
}

fn ferror(ctx: &mut Context) -> JoyResult<()> {
    ctx.stack.pop_file("ferror")?;
    ctx.stack.push(Value::Boolean(false));
    Ok(())
}

fn fgetch(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("fgetch")?;
    match ctx.files.read_char("fgetch", handle)? {
        Some(byte) => ctx.stack.push(Value::Char(byte)),
        None => ctx.stack.push(Value::Integer(-1)),
    }
    Ok(())
}

fn fgets(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("fgets")?;
    let line = ctx.files.read_line("fgets", handle)?;
    ctx.stack.push(Value::String(JoyString(line)));
    Ok(())
}

fn fread(ctx: &mut Context) -> JoyResult<()> {
    let n = ctx.stack.pop_integer("fread")?;
    let handle = ctx.stack.pop_file("fread")?;
    let mut buf = Vec::new();
    for _ in 0..n.max(0) {
        match ctx.files.read_char("fread", handle)? {
            Some(b) => buf.push(b),
            None => break,
        }
    }
    ctx.stack.push(Value::String(JoyString(buf)));
    Ok(())
}

fn fput(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("fput")?;
    let v = ctx.stack.pop("fput")?;
    ctx.files.write_bytes("fput", handle, v.to_string().as_bytes())
}

fn fputch(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("fputch")?;
    let byte = ctx.stack.pop_char("fputch")?;
    ctx.files.write_bytes("fputch", handle, &[byte])
}

fn fputchars(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("fputchars")?;
    let s = ctx.stack.pop_string("fputchars")?;
    ctx.files.write_bytes("fputchars", handle, &s.0)
}

/// Alias for `fputchars` kept distinct because the original vocabulary
/// names them separately (one prints a `String` value, the other a raw
/// char buffer); here both map onto `JoyString`.
fn fputstring(ctx: &mut Context) -> JoyResult<()> {
    fputchars(ctx)
}

fn fwrite(ctx: &mut Context) -> JoyResult<()> {
    fputchars(ctx)
}

fn fseek(ctx: &mut Context) -> JoyResult<()> {
    let pos = ctx.stack.pop_integer("fseek")?;
    let handle = ctx.stack.pop_file("fseek")?;
    ctx.files.seek("fseek", handle, pos)
}

fn ftell(ctx: &mut Context) -> JoyResult<()> {
    let handle = ctx.stack.pop_file("ftell")?;
    let pos = ctx.files.tell("ftell", handle)?;
    ctx.stack.push(Value::Integer(pos));
    Ok(())
}

/// `fremove`/`frename` report failure as a pushed boolean rather than
/// raising, per the runtime's documented error-reporting exception; the
/// underlying I/O error (if any) is only ever logged.
fn fremove(ctx: &mut Context) -> JoyResult<()> {
    let path = ctx.stack.pop_string("fremove")?;
    let ok = match std::fs::remove_file(path.to_string()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("fremove failed: {e}");
            false
        }
    };
    ctx.stack.push(Value::Boolean(ok));
    Ok(())
}

fn frename(ctx: &mut Context) -> JoyResult<()> {
    let to = ctx.stack.pop_string("frename")?;
    let from = ctx.stack.pop_string("frename")?;
    let ok = match std::fs::rename(from.to_string(), to.to_string()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("frename failed: {e}");
            false
        }
    };
    ctx.stack.push(Value::Boolean(ok));
    Ok(())
}
