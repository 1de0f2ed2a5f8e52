//! The interactive demos: each one drives the bridge the way host code
//! would, printing what comes back.

use anyhow::Result;
use colored::Colorize;
use krait_delegate::{builtins, import_module, Arg, DelegateError, ForeignException};

fn banner(text: &str) {
    println!("\n{}", text.bold());
}

fn render_exception(exc: &ForeignException) -> Result<()> {
    if let Some(exc_type) = &exc.exc_type {
        println!("type:  {}", exc_type.to_text()?);
    }
    if let Some(value) = &exc.value {
        println!("value: {}", value.to_text()?);
    }
    match &exc.traceback {
        Some(tb) => {
            let formatted = import_module("traceback")?
                .attr("format_tb")?
                .call(&[Arg::from(tb)])?;
            println!("traceback: {}", formatted.to_text()?);
        }
        None => println!("traceback: none (no interpreter frames)"),
    }
    Ok(())
}

pub fn exceptions() -> Result<()> {
    let b = builtins()?;
    let zero = b.attr("int")?.call(&[Arg::from("0")])?;

    banner("Dividing zero by zero through a delegated operator");
    match zero.invoke("/", &[Arg::from(&zero)]) {
        Ok(value) => println!("unexpectedly fine: {}", value.to_text()?),
        Err(DelegateError::Foreign(exc)) => render_exception(&exc)?,
        Err(other) => return Err(other.into()),
    }

    banner("Dividing inside an evaluated frame, so a traceback exists");
    match b.attr("eval")?.call(&[Arg::from("1/0")]) {
        Ok(value) => println!("unexpectedly fine: {}", value.to_text()?),
        Err(DelegateError::Foreign(exc)) => render_exception(&exc)?,
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

pub fn kwargs() -> Result<()> {
    banner("Calling the foreign dict constructor with keywords");
    let d = builtins()?.attr("dict")?.call_kw(&[], |kw| {
        kw.set("foo", "a value")?;
        kw.set("bar", 42)
    })?;
    println!("{}", d.to_text()?);
    Ok(())
}

pub fn special_operators() -> Result<()> {
    let b = builtins()?;
    let s = b.attr("str")?.call(&[Arg::from("a string ")])?;

    banner("String catenation via a special operator");
    println!("{}", s.invoke("+", &[Arg::from(&s)])?.to_text()?);

    banner("String multiplication via a special operator");
    let four = b.attr("int")?.call(&[Arg::from("4")])?;
    println!("{}", s.invoke("*", &[Arg::from(&four)])?.to_text()?);
    Ok(())
}

pub fn function_application() -> Result<()> {
    banner("Building a foreign function with eval() and applying it");
    let b = builtins()?;
    let dict_ctor = b.attr("dict")?;
    let made = b.attr("eval")?.call(&[
        Arg::from("lambda: 'hello world'"),
        Arg::from(&dict_ctor.call(&[])?),
        Arg::from(&dict_ctor.call(&[])?),
    ])?;
    println!("{}", made.call(&[])?.to_text()?);
    Ok(())
}

pub fn dynamic_attribute_binding() -> Result<()> {
    banner("Binding an attribute dynamically on a foreign module");
    let textwrap = import_module("textwrap")?;
    textwrap.set_attr("demo", "from a dynamically bound attribute")?;
    println!("{}", textwrap.attr("demo")?.to_text()?);
    Ok(())
}

pub fn parse_int(text: &str) -> Result<()> {
    banner("Parsing with the foreign int constructor");
    let parsed = builtins()?.attr("int")?.call(&[Arg::from(text)])?;
    println!("{}", parsed.repr()?);
    Ok(())
}
