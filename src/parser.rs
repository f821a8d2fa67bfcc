//! Netlist parser.
//!
//! Reads the netlist text format into a [`Netlist`].
//!
//! # Supported syntax
//!
//! ```text
//! title line (always the first line)
//! * comment line
//! Rname n1 n2 R                         (resistor)
//! Nname n1 n2 v1 i1 v2 i2 [v3 i3 ...]   (piecewise-linear resistor)
//! $name p n cp cn [g_on g_off v_ref]    (voltage-controlled switch)
//! Lname n1 n2 L [IC=i0]                 (inductor)
//! Cname n1 n2 C [IC=v0]                 (capacitor)
//! Ename p n cp cn Av                    (voltage-controlled voltage source)
//! Fname p n cp cn Ai                    (current-controlled current source)
//! Gname p n cp cn Gm                    (voltage-controlled current source)
//! Hname p n cp cn Rm                    (current-controlled voltage source)
//! Iname p n <signal>                    (current source)
//! Vname p n <signal>                    (voltage source)
//! Oname out_p out_n in_p in_n           (ideal op-amp)
//! .TRAN stop step ADMO<k> internal_steps [UIC]
//! .END
//! ```
//!
//! Signals are `DC v`, a bare `v`, `SIN offset amplitude freq delay damping
//! phase_deg cycles` or `PULSE initial pulsed delay rise fall width period
//! cycles`. Nodes are non-negative integers with 0 as ground. Values are
//! plain numeric literals; keywords are case-insensitive.

use std::path::Path;

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1};
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{map, map_res, opt};
use nom::multi::many0;
use nom::number::complete::double;
use nom::sequence::preceded;
use nom::IResult;
use nom::Parser;

use crate::elements::{
    Capacitor, ControlledSource, ControlledSourceKind, Element, IdealOpAmp, Inductor,
    NonlinearResistor, Resistor, Source, VoltageControlledSwitch,
};
use crate::error::{AmspiceError, Result};
use crate::ir::{Netlist, NodeIndex, Statement, TranConfig};
use crate::signal::Signal;
use crate::Scalar;

/// Read and parse a netlist file.
pub fn read_netlist(path: impl AsRef<Path>) -> Result<Netlist> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| AmspiceError::FileNotFound(format!("{}: {e}", path.display())))?;
    parse(&text)
}

/// Parse netlist text. The first line is the title.
pub fn parse(input: &str) -> Result<Netlist> {
    let mut lines = input.lines();
    let mut netlist = Netlist {
        title: lines.next().unwrap_or_default().trim().to_string(),
        ..Default::default()
    };

    for (idx, raw_line) in lines.enumerate() {
        let line = raw_line.trim();

        // Skip blank lines and comments
        if line.is_empty() || line.starts_with('*') {
            continue;
        }

        let upper = line.to_ascii_uppercase();
        if upper == ".END" {
            break;
        }

        let parsed = if upper.starts_with('.') || upper.starts_with("TRAN") {
            parse_statement(line).map(|s| netlist.statements.push(s))
        } else {
            parse_element(line).map(|e| netlist.elements.push(e))
        };
        parsed.map_err(|e| AmspiceError::BadFile {
            // The title is line 1.
            line: idx + 2,
            source: Box::new(e),
        })?;
    }

    tracing::debug!(
        title = %netlist.title,
        elements = netlist.elements.len(),
        statements = netlist.statements.len(),
        "netlist parsed"
    );
    Ok(netlist)
}

/// Parse a single element line, dispatching on its first character.
pub fn parse_element(line: &str) -> Result<Element> {
    let line = line.trim();
    let first = line
        .chars()
        .next()
        .ok_or_else(|| AmspiceError::BadElementString("empty element line".to_string()))?;

    match first.to_ascii_uppercase() {
        'R' => parse_resistor(line),
        'N' => parse_nonlinear_resistor(line),
        '$' => parse_switch(line),
        'L' => parse_inductor(line),
        'C' => parse_capacitor(line),
        'E' | 'F' | 'G' | 'H' => parse_controlled(line),
        'I' => parse_source(line).map(Element::CurrentSource),
        'V' => parse_source(line).map(Element::VoltageSource),
        'O' => parse_opamp(line),
        _ => Err(bad(line, &format!("unknown element type '{first}'"))),
    }
}

fn bad(line: &str, detail: &str) -> AmspiceError {
    AmspiceError::BadElementString(format!("{detail} in \"{line}\""))
}

/// Run a nom parser over a whole line; leftover text is an error.
fn complete<'a, T>(line: &'a str, result: IResult<&'a str, T>, what: &str) -> Result<T> {
    match result {
        Ok((rest, value)) if rest.trim().is_empty() => Ok(value),
        Ok((rest, _)) => Err(bad(line, &format!("unexpected \"{}\" after {what}", rest.trim()))),
        Err(_) => Err(bad(line, &format!("malformed {what}"))),
    }
}

// ---------------------------------------------------------------------------
// Token parsers
// ---------------------------------------------------------------------------

/// Element name: everything up to the first whitespace, prefix letter included.
fn element_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace()).parse(input)
}

/// Node number.
fn node(input: &str) -> IResult<&str, NodeIndex> {
    map_res(digit1, |s: &str| s.parse::<NodeIndex>()).parse(input)
}

/// Whitespace-separated numeric literal.
fn value(input: &str) -> IResult<&str, Scalar> {
    preceded(space1, double).parse(input)
}

/// Whitespace-separated unsigned integer.
fn count(input: &str) -> IResult<&str, u32> {
    preceded(space1, map_res(digit1, |s: &str| s.parse::<u32>())).parse(input)
}

fn two_terminal(input: &str) -> IResult<&str, (&str, NodeIndex, NodeIndex)> {
    (element_name, preceded(space1, node), preceded(space1, node)).parse(input)
}

fn four_terminal(input: &str) -> IResult<&str, (&str, [NodeIndex; 4])> {
    map(
        (
            element_name,
            preceded(space1, node),
            preceded(space1, node),
            preceded(space1, node),
            preceded(space1, node),
        ),
        |(name, p, n, cp, cn)| (name, [p, n, cp, cn]),
    )
    .parse(input)
}

/// Optional ` IC=value` suffix.
fn initial_condition(input: &str) -> IResult<&str, Option<Scalar>> {
    opt(preceded(
        (space1, tag_no_case("IC"), space0, tag("="), space0),
        double,
    ))
    .parse(input)
}

// ---------------------------------------------------------------------------
// Passive elements
// ---------------------------------------------------------------------------

/// `Rname n1 n2 R`
fn parse_resistor(line: &str) -> Result<Element> {
    let (name, n1, n2, r) = complete(
        line,
        map((two_terminal, value), |((name, n1, n2), r)| (name, n1, n2, r)).parse(line),
        "resistor",
    )?;
    if r == 0.0 {
        return Err(bad(line, "resistance must be nonzero"));
    }
    Ok(Element::Resistor(Resistor::new(name, n1, n2, r)))
}

/// `Nname n1 n2 v1 i1 v2 i2 ...`
fn parse_nonlinear_resistor(line: &str) -> Result<Element> {
    let ((name, n1, n2), values) = complete(
        line,
        (two_terminal, many0(value)).parse(line),
        "nonlinear resistor",
    )?;
    if values.len() % 2 != 0 {
        return Err(bad(line, "breakpoints must come in (v, i) pairs"));
    }
    let points = values.chunks_exact(2).map(|p| (p[0], p[1])).collect();
    NonlinearResistor::new(name, n1, n2, points).map(Element::NonlinearResistor)
}

/// `$name p n cp cn [g_on g_off v_ref]`, missing parameters are 0.
fn parse_switch(line: &str) -> Result<Element> {
    let ((name, nodes), values) =
        complete(line, (four_terminal, many0(value)).parse(line), "switch")?;
    if values.len() > 3 {
        return Err(bad(line, "switch takes at most three parameters"));
    }
    let param = |i: usize| values.get(i).copied().unwrap_or(0.0);
    Ok(Element::Switch(VoltageControlledSwitch::new(
        name,
        nodes,
        param(0),
        param(1),
        param(2),
    )))
}

// ---------------------------------------------------------------------------
// Reactive elements
// ---------------------------------------------------------------------------

fn reactive(line: &str, what: &str) -> Result<(String, NodeIndex, NodeIndex, Scalar, Scalar)> {
    let ((name, n1, n2), v, ic) = complete(
        line,
        (two_terminal, value, initial_condition).parse(line),
        what,
    )?;
    Ok((name.to_string(), n1, n2, v, ic.unwrap_or(0.0)))
}

/// `Lname n1 n2 L [IC=i0]`
fn parse_inductor(line: &str) -> Result<Element> {
    let (name, n1, n2, l, ic) = reactive(line, "inductor")?;
    Ok(Element::Inductor(Inductor::new(name, n1, n2, l, ic)))
}

/// `Cname n1 n2 C [IC=v0]`
fn parse_capacitor(line: &str) -> Result<Element> {
    let (name, n1, n2, c, ic) = reactive(line, "capacitor")?;
    Ok(Element::Capacitor(Capacitor::new(name, n1, n2, c, ic)))
}

// ---------------------------------------------------------------------------
// Controlled sources and op-amp
// ---------------------------------------------------------------------------

/// `Xname p n cp cn gain` for X in E, F, G, H.
fn parse_controlled(line: &str) -> Result<Element> {
    let ((name, nodes), gain) = complete(
        line,
        (four_terminal, value).parse(line),
        "controlled source",
    )?;
    let kind = name
        .chars()
        .next()
        .and_then(ControlledSourceKind::from_prefix)
        .ok_or_else(|| bad(line, "unknown controlled source"))?;
    Ok(Element::Controlled(ControlledSource::new(kind, name, nodes, gain)))
}

/// `Oname out_p out_n in_p in_n`
fn parse_opamp(line: &str) -> Result<Element> {
    let (name, nodes) = complete(line, four_terminal(line), "op-amp")?;
    Ok(Element::OpAmp(IdealOpAmp::new(name, nodes)))
}

// ---------------------------------------------------------------------------
// Independent sources and signals
// ---------------------------------------------------------------------------

/// `Xname p n <signal>`
fn parse_source(line: &str) -> Result<Source> {
    let ((name, p, n), signal) = complete(
        line,
        (two_terminal, preceded(space1, signal)).parse(line),
        "source",
    )?;
    Ok(Source::new(name, p, n, signal))
}

/// Parse a signal description such as `DC 5` or `SIN 0 1 1e3 0 0 0 10`.
pub fn parse_signal(input: &str) -> Result<Signal> {
    let input = input.trim();
    complete(input, signal(input), "signal")
}

fn signal(input: &str) -> IResult<&str, Signal> {
    alt((dc_signal, sin_signal, pulse_signal, map(double, Signal::Constant))).parse(input)
}

fn dc_signal(input: &str) -> IResult<&str, Signal> {
    map(preceded(tag_no_case("DC"), value), Signal::Constant).parse(input)
}

fn sin_signal(input: &str) -> IResult<&str, Signal> {
    map(
        preceded(
            tag_no_case("SIN"),
            (value, value, value, value, value, value, count),
        ),
        |(offset, amplitude, freq_hz, delay, damping, phase_deg, cycles)| {
            Signal::DampedSinusoid {
                offset,
                amplitude,
                freq_hz,
                delay,
                damping,
                phase_deg,
                cycles,
            }
        },
    )
    .parse(input)
}

fn pulse_signal(input: &str) -> IResult<&str, Signal> {
    map(
        preceded(
            tag_no_case("PULSE"),
            (value, value, value, value, value, value, value, count),
        ),
        |(initial, pulsed, delay, rise, fall, width, period, cycles)| Signal::PulseTrain {
            initial,
            pulsed,
            delay,
            rise,
            fall,
            width,
            period,
            cycles,
        },
    )
    .parse(input)
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// Parse a statement line. The leading dot is optional.
pub fn parse_statement(line: &str) -> Result<Statement> {
    let line = line.trim();
    let body = line.strip_prefix('.').unwrap_or(line);
    let keyword = body.split_whitespace().next().unwrap_or_default();

    if keyword.eq_ignore_ascii_case("TRAN") {
        complete(line, tran(body), "TRAN statement").map(Statement::Tran)
    } else {
        Err(bad(line, &format!("unknown statement \"{keyword}\"")))
    }
}

/// `TRAN stop step ADMO<k> internal_steps [UIC]`
fn tran(input: &str) -> IResult<&str, TranConfig> {
    map(
        preceded(
            tag_no_case("TRAN"),
            (
                value,
                value,
                preceded(
                    (space1, tag_no_case("ADMO")),
                    map_res(digit1, |s: &str| s.parse::<u32>()),
                ),
                preceded(space1, map_res(digit1, |s: &str| s.parse::<usize>())),
                opt(preceded(space1, tag_no_case("UIC"))),
            ),
        ),
        |(stop_time, step, integration_order, internal_steps, uic)| TranConfig {
            stop_time,
            step,
            integration_order,
            internal_steps,
            use_initial_conditions: uic.is_some(),
        },
    )
    .parse(input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
