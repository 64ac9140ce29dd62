//! The Parameter Translator (§4.2): one parsing function per command
//! family, each turning the legacy variadic argument vector into a
//! structured options record. Called directly by the matching
//! `commands::*` function (e.g. `commands::strings::set` calls
//! `parse_set_options`) before dispatching to the native driver call.
//!
//! Because the command-surface functions are generic over
//! [`super::Driver`](crate::commands::Driver), the same parser serves the
//! buffered pipeline/transaction path for free (§4.5): queuing a command on
//! a `Pipeline`/`Transaction` is just calling the usual `commands::*`
//! function with the buffer object in place of a connected client, so there
//! is no separate replay path to keep in sync.

use crate::error::{Error, Result};
use crate::value::Value as Arg;

fn token(arg: &Arg) -> Option<String> {
    match arg {
        Arg::Str(s) => Some(s.to_ascii_uppercase()),
        Arg::Bytes(b) => std::str::from_utf8(b).ok().map(|s| s.to_ascii_uppercase()),
        _ => None,
    }
}

fn as_i64(arg: &Arg, command: &str) -> Result<i64> {
    match arg {
        Arg::Int(n) => Ok(*n),
        Arg::Double(n) => Ok(*n as i64),
        Arg::Str(s) => s.parse().map_err(|_| Error::WrongArity(command.to_string())),
        Arg::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::WrongArity(command.to_string())),
        Arg::Json(_) => Err(Error::WrongArity(command.to_string())),
    }
}

fn as_f64(arg: &Arg, command: &str) -> Result<f64> {
    match arg {
        Arg::Int(n) => Ok(*n as f64),
        Arg::Double(n) => Ok(*n),
        Arg::Str(s) => s.parse().map_err(|_| Error::WrongArity(command.to_string())),
        Arg::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::WrongArity(command.to_string())),
        Arg::Json(_) => Err(Error::WrongArity(command.to_string())),
    }
}

fn as_string(arg: &Arg) -> String {
    match arg {
        Arg::Str(s) => s.clone(),
        Arg::Int(n) => n.to_string(),
        Arg::Double(n) => crate::value::stringify_double(*n),
        Arg::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Arg::Json(v) => v.to_string(),
    }
}

// ---------------------------------------------------------------------
// SET
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireUnit {
    Seconds,
    Millis,
    UnixSeconds,
    UnixMillis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub unit: ExpireUnit,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCondition {
    OnlyIfExists,
    OnlyIfDoesNotExist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOptions {
    pub expiry: Option<Expiry>,
    pub keep_ttl: bool,
    pub condition: Option<SetCondition>,
    pub get: bool,
}

/// Parses the trailing option tokens of `SET key value [EX n|PX n|EXAT
/// n|PXAT n] [KEEPTTL] [NX|XX] [GET]`.
pub fn parse_set_options(tokens: &[Arg]) -> Result<SetOptions> {
    let mut opts = SetOptions::default();
    let mut i = 0;
    while i < tokens.len() {
        let Some(tok) = token(&tokens[i]) else {
            return Err(Error::UnknownToken { command: "SET".into(), token: as_string(&tokens[i]) });
        };
        match tok.as_str() {
            "EX" | "PX" | "EXAT" | "PXAT" => {
                let count_arg = tokens.get(i + 1).ok_or_else(|| Error::WrongArity("SET".to_string()))?;
                let count = as_i64(count_arg, "SET")?;
                let unit = match tok.as_str() {
                    "EX" => ExpireUnit::Seconds,
                    "PX" => ExpireUnit::Millis,
                    "EXAT" => ExpireUnit::UnixSeconds,
                    _ => ExpireUnit::UnixMillis,
                };
                opts.expiry = Some(Expiry { unit, count });
                i += 2;
            }
            "KEEPTTL" => {
                opts.keep_ttl = true;
                i += 1;
            }
            "NX" => {
                opts.condition = Some(SetCondition::OnlyIfDoesNotExist);
                i += 1;
            }
            "XX" => {
                opts.condition = Some(SetCondition::OnlyIfExists);
                i += 1;
            }
            "GET" => {
                opts.get = true;
                i += 1;
            }
            other => {
                return Err(Error::UnknownToken { command: "SET".into(), token: other.to_string() });
            }
        }
    }
    Ok(opts)
}

// ---------------------------------------------------------------------
// ZADD
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZaddCondition {
    OnlyIfExists,
    OnlyIfDoesNotExist,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZaddOptions {
    pub condition: Option<ZaddCondition>,
    pub changed: bool,
    pub incr: bool,
    pub members: Vec<(f64, Arg)>,
}

/// Parses `ZADD key [NX|XX] [CH] [INCR] score member [score member ...]`.
pub fn parse_zadd_options(tokens: &[Arg]) -> Result<ZaddOptions> {
    let mut condition = None;
    let mut changed = false;
    let mut incr = false;
    let mut i = 0;
    while i < tokens.len() {
        match token(&tokens[i]).as_deref() {
            Some("NX") => {
                condition = Some(ZaddCondition::OnlyIfDoesNotExist);
                i += 1;
            }
            Some("XX") => {
                condition = Some(ZaddCondition::OnlyIfExists);
                i += 1;
            }
            Some("CH") => {
                changed = true;
                i += 1;
            }
            Some("INCR") => {
                incr = true;
                i += 1;
            }
            _ => break,
        }
    }
    let rest = &tokens[i..];
    if rest.is_empty() || rest.len() % 2 != 0 {
        return Err(Error::WrongArity("ZADD".to_string()));
    }
    if incr && rest.len() != 2 {
        return Err(Error::WrongArity("ZADD".to_string()));
    }
    let mut members = Vec::with_capacity(rest.len() / 2);
    for pair in rest.chunks_exact(2) {
        let score = as_f64(&pair[0], "ZADD")?;
        members.push((score, pair[1].clone()));
    }
    Ok(ZaddOptions { condition, changed, incr, members })
}

// ---------------------------------------------------------------------
// ZRANGEBYSCORE / ZREVRANGEBYSCORE
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreBound {
    Inclusive(f64),
    Exclusive(f64),
    NegInfinity,
    PosInfinity,
}

pub fn parse_score_bound(raw: &str, command: &str) -> Result<ScoreBound> {
    match raw {
        "-inf" => Ok(ScoreBound::NegInfinity),
        "+inf" | "inf" => Ok(ScoreBound::PosInfinity),
        _ if raw.starts_with('(') => raw[1..]
            .parse()
            .map(ScoreBound::Exclusive)
            .map_err(|_| Error::WrongArity(command.to_string())),
        _ => raw.parse().map(ScoreBound::Inclusive).map_err(|_| Error::WrongArity(command.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeLimit {
    pub offset: i64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZRangeByScoreOptions {
    pub min: ScoreBound,
    pub max: ScoreBound,
    pub with_scores: bool,
    pub limit: Option<RangeLimit>,
    /// Boundaries are always sorted ascending before dispatch; `reverse`
    /// tells the command surface to pass `reverse=true` to the driver
    /// regardless of which legacy command (`ZRANGEBYSCORE` vs
    /// `ZREVRANGEBYSCORE`) produced this record — §4.2/§4.4.
    pub reverse: bool,
}

/// Parses the trailing tokens of `ZRANGEBYSCORE`/`ZREVRANGEBYSCORE` —
/// `min max [WITHSCORES] [LIMIT offset count]`. `reverse` indicates the
/// caller used the `ZREV...` form, where the legacy API accepts `max min`
/// (descending) argument order.
pub fn parse_zrangebyscore_options(min_raw: &str, max_raw: &str, tokens: &[Arg], reverse: bool, command: &str) -> Result<ZRangeByScoreOptions> {
    let (mut min, mut max) = (parse_score_bound(min_raw, command)?, parse_score_bound(max_raw, command)?);
    if reverse {
        // the caller passed (max, min) in descending order; un-swap here so
        // `min`/`max` are always ascending, then the command surface flips
        // them back to `(max, min)` only when talking to the driver's
        // reverse-range call.
        std::mem::swap(&mut min, &mut max);
    }

    let mut with_scores = false;
    let mut limit = None;
    let mut i = 0;
    while i < tokens.len() {
        match token(&tokens[i]).as_deref() {
            Some("WITHSCORES") => {
                with_scores = true;
                i += 1;
            }
            Some("LIMIT") => {
                let offset = tokens.get(i + 1).ok_or_else(|| Error::WrongArity(command.to_string()))?;
                let count = tokens.get(i + 2).ok_or_else(|| Error::WrongArity(command.to_string()))?;
                limit = Some(RangeLimit { offset: as_i64(offset, command)?, count: as_i64(count, command)? });
                i += 3;
            }
            _ => return Err(Error::UnknownToken { command: command.to_string(), token: as_string(&tokens[i]) }),
        }
    }

    Ok(ZRangeByScoreOptions { min, max, with_scores, limit, reverse })
}

// ---------------------------------------------------------------------
// ZRANGEBYLEX / ZREVRANGEBYLEX
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LexBound {
    Inclusive(String),
    Exclusive(String),
    NegInfinity,
    PosInfinity,
}

pub fn parse_lex_bound(raw: &str, command: &str) -> Result<LexBound> {
    match raw {
        "-" => Ok(LexBound::NegInfinity),
        "+" => Ok(LexBound::PosInfinity),
        _ if raw.starts_with('[') => Ok(LexBound::Inclusive(raw[1..].to_string())),
        _ if raw.starts_with('(') => Ok(LexBound::Exclusive(raw[1..].to_string())),
        _ => Err(Error::UnknownToken { command: command.to_string(), token: raw.to_string() }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZRangeByLexOptions {
    pub min: LexBound,
    pub max: LexBound,
    pub limit: Option<RangeLimit>,
    pub reverse: bool,
}

pub fn parse_zrangebylex_options(min_raw: &str, max_raw: &str, tokens: &[Arg], reverse: bool, command: &str) -> Result<ZRangeByLexOptions> {
    let (mut min, mut max) = (parse_lex_bound(min_raw, command)?, parse_lex_bound(max_raw, command)?);
    if reverse {
        std::mem::swap(&mut min, &mut max);
    }
    let mut limit = None;
    let mut i = 0;
    while i < tokens.len() {
        match token(&tokens[i]).as_deref() {
            Some("LIMIT") => {
                let offset = tokens.get(i + 1).ok_or_else(|| Error::WrongArity(command.to_string()))?;
                let count = tokens.get(i + 2).ok_or_else(|| Error::WrongArity(command.to_string()))?;
                limit = Some(RangeLimit { offset: as_i64(offset, command)?, count: as_i64(count, command)? });
                i += 3;
            }
            _ => return Err(Error::UnknownToken { command: command.to_string(), token: as_string(&tokens[i]) }),
        }
    }
    Ok(ZRangeByLexOptions { min, max, limit, reverse })
}

// ---------------------------------------------------------------------
// XADD / XTRIM trim grammar
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimStrategy {
    MaxLen,
    MinId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimBound {
    Exact,
    Approximate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimOptions {
    pub strategy: TrimStrategy,
    pub bound: TrimBound,
    pub threshold: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XAddOptions {
    pub make_stream: bool,
    pub id: Option<String>,
    pub trim: Option<TrimOptions>,
}

/// Parses `XADD key [NOMKSTREAM] [MAXLEN|MINID [=|~] threshold [LIMIT n]]
/// id field value [field value ...]`. `make_stream` is the negation of
/// `NOMKSTREAM`'s presence (absent ⇒ stream is created if missing).
pub fn parse_xadd_prefix<'a>(tokens: &'a [Arg]) -> Result<(XAddOptions, &'a [Arg])> {
    let mut opts = XAddOptions { make_stream: true, id: None, trim: None };
    let mut i = 0;
    if matches!(token(tokens.get(0).ok_or_else(|| Error::WrongArity("XADD".to_string()))?).as_deref(), Some("NOMKSTREAM")) {
        opts.make_stream = false;
        i += 1;
    }
    if let Some(t) = tokens.get(i).and_then(token) {
        if t == "MAXLEN" || t == "MINID" {
            let strategy = if t == "MAXLEN" { TrimStrategy::MaxLen } else { TrimStrategy::MinId };
            i += 1;
            let mut bound = TrimBound::Exact;
            if let Some(next) = tokens.get(i).and_then(token) {
                if next == "~" {
                    bound = TrimBound::Approximate;
                    i += 1;
                } else if next == "=" {
                    i += 1;
                }
            }
            let threshold_arg = tokens.get(i).ok_or_else(|| Error::WrongArity("XADD".to_string()))?;
            let threshold = as_string(threshold_arg);
            i += 1;
            let mut limit = None;
            if let Some(t) = tokens.get(i).and_then(token) {
                if t == "LIMIT" {
                    let n = tokens.get(i + 1).ok_or_else(|| Error::WrongArity("XADD".to_string()))?;
                    limit = Some(as_i64(n, "XADD")?);
                    i += 2;
                }
            }
            opts.trim = Some(TrimOptions { strategy, bound, threshold, limit });
        }
    }
    let id_arg = tokens.get(i).ok_or_else(|| Error::WrongArity("XADD".to_string()))?;
    let id_str = as_string(id_arg);
    opts.id = if id_str == "*" { None } else { Some(id_str) };
    i += 1;
    let fields = &tokens[i..];
    if fields.is_empty() || fields.len() % 2 != 0 {
        return Err(Error::WrongArity("XADD".to_string()));
    }
    Ok((opts, fields))
}

/// `XTRIM key MAXLEN|MINID [=|~] threshold [LIMIT n]` — same grammar as the
/// trailing part of `XADD`, without the leading id/field pairs.
pub fn parse_xtrim_options(tokens: &[Arg]) -> Result<TrimOptions> {
    let mut i = 0;
    let strategy_tok = token(tokens.get(i).ok_or_else(|| Error::WrongArity("XTRIM".to_string()))?)
        .ok_or_else(|| Error::WrongArity("XTRIM".to_string()))?;
    let strategy = match strategy_tok.as_str() {
        "MAXLEN" => TrimStrategy::MaxLen,
        "MINID" => TrimStrategy::MinId,
        other => return Err(Error::UnknownToken { command: "XTRIM".into(), token: other.to_string() }),
    };
    i += 1;
    let mut bound = TrimBound::Exact;
    if let Some(next) = tokens.get(i).and_then(token) {
        if next == "~" {
            bound = TrimBound::Approximate;
            i += 1;
        } else if next == "=" {
            i += 1;
        }
    }
    let threshold = as_string(tokens.get(i).ok_or_else(|| Error::WrongArity("XTRIM".to_string()))?);
    i += 1;
    let mut limit = None;
    if let Some(t) = tokens.get(i).and_then(token) {
        if t == "LIMIT" {
            let n = tokens.get(i + 1).ok_or_else(|| Error::WrongArity("XTRIM".to_string()))?;
            limit = Some(as_i64(n, "XTRIM")?);
        }
    }
    Ok(TrimOptions { strategy, bound, threshold, limit })
}

// ---------------------------------------------------------------------
// XREAD / XREADGROUP
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XReadOptions {
    pub count: Option<i64>,
    pub block_ms: Option<i64>,
    pub noack: bool,
    pub group: Option<(String, String)>,
    pub streams: Vec<(String, String)>,
}

/// Parses `[GROUP group consumer] [COUNT n] [BLOCK ms] [NOACK] STREAMS k1
/// .. kn id1 .. idn`. Keys/ids are split at the midpoint of the trailing
/// `STREAMS` list, per §4.2.
pub fn parse_xread_options(tokens: &[Arg], command: &str) -> Result<XReadOptions> {
    let mut opts = XReadOptions::default();
    let mut i = 0;
    if matches!(tokens.first().and_then(token).as_deref(), Some("GROUP")) {
        let group = tokens.get(1).ok_or_else(|| Error::WrongArity(command.to_string())).map(as_string)?;
        let consumer = tokens.get(2).ok_or_else(|| Error::WrongArity(command.to_string())).map(as_string)?;
        opts.group = Some((group, consumer));
        i = 3;
    }
    while i < tokens.len() {
        match token(&tokens[i]).as_deref() {
            Some("COUNT") => {
                opts.count = Some(as_i64(tokens.get(i + 1).ok_or_else(|| Error::WrongArity(command.to_string()))?, command)?);
                i += 2;
            }
            Some("BLOCK") => {
                opts.block_ms = Some(as_i64(tokens.get(i + 1).ok_or_else(|| Error::WrongArity(command.to_string()))?, command)?);
                i += 2;
            }
            Some("NOACK") => {
                opts.noack = true;
                i += 1;
            }
            Some("STREAMS") => {
                let rest = &tokens[i + 1..];
                if rest.is_empty() || rest.len() % 2 != 0 {
                    return Err(Error::WrongArity(command.to_string()));
                }
                let mid = rest.len() / 2;
                let (keys, ids) = rest.split_at(mid);
                opts.streams = keys.iter().zip(ids.iter()).map(|(k, v)| (as_string(k), as_string(v))).collect();
                i = tokens.len();
            }
            _ => return Err(Error::UnknownToken { command: command.to_string(), token: as_string(&tokens[i]) }),
        }
    }
    if opts.streams.is_empty() {
        return Err(Error::WrongArity(command.to_string()));
    }
    Ok(opts)
}

// ---------------------------------------------------------------------
// BLPOP / BRPOP / BZPOPMIN / BZPOPMAX
// ---------------------------------------------------------------------

/// The legacy blocking pop commands accept the timeout either first or
/// last; this detects which by trying to parse each end as a number,
/// preferring the last position per the original client's own precedence
/// (a key literally named e.g. `"5"` is vanishingly rare and the trailing
/// position is checked first).
pub fn split_blocking_timeout(args: &[Arg], command: &str) -> Result<(Vec<Arg>, f64)> {
    if args.len() < 2 {
        return Err(Error::WrongArity(command.to_string()));
    }
    if let Ok(timeout) = as_f64(&args[args.len() - 1], command) {
        return Ok((args[..args.len() - 1].to_vec(), timeout));
    }
    if let Ok(timeout) = as_f64(&args[0], command) {
        return Ok((args[1..].to_vec(), timeout));
    }
    Err(Error::WrongArity(command.to_string()))
}

// ---------------------------------------------------------------------
// XGROUP
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XGroupCommand {
    Create { group: String, id: String, mkstream: bool },
    Destroy { group: String },
    CreateConsumer { group: String, consumer: String },
    DelConsumer { group: String, consumer: String },
    SetId { group: String, id: String, entries_read: Option<i64> },
}

pub fn parse_xgroup(tokens: &[Arg]) -> Result<XGroupCommand> {
    let sub = token(tokens.get(0).ok_or_else(|| Error::WrongArity("XGROUP".to_string()))?)
        .ok_or_else(|| Error::WrongArity("XGROUP".to_string()))?;
    let arg = |idx: usize| tokens.get(idx).ok_or_else(|| Error::WrongArity("XGROUP".to_string())).map(as_string);
    Ok(match sub.as_str() {
        "CREATE" => {
            let group = arg(2)?;
            let id = arg(3)?;
            let mkstream = tokens.get(4).and_then(token).as_deref() == Some("MKSTREAM");
            XGroupCommand::Create { group, id, mkstream }
        }
        "DESTROY" => XGroupCommand::Destroy { group: arg(2)? },
        "CREATECONSUMER" => XGroupCommand::CreateConsumer { group: arg(2)?, consumer: arg(3)? },
        "DELCONSUMER" => XGroupCommand::DelConsumer { group: arg(2)?, consumer: arg(3)? },
        "SETID" => {
            let group = arg(2)?;
            let id = arg(3)?;
            let entries_read = if tokens.get(4).and_then(token).as_deref() == Some("ENTRIESREAD") {
                Some(as_i64(tokens.get(5).ok_or_else(|| Error::WrongArity("XGROUP".to_string()))?, "XGROUP")?)
            } else {
                None
            };
            XGroupCommand::SetId { group, id, entries_read }
        }
        other => return Err(Error::UnknownToken { command: "XGROUP".into(), token: other.to_string() }),
    })
}

// ---------------------------------------------------------------------
// MSET / HSET — variadic pairs or a single record object
// ---------------------------------------------------------------------

/// Accepts `(f, v)+` as an already-flattened, even-length slice. The
/// "single record object" form §4.2 also allows is a caller-side concern:
/// a caller holding a JS-style record flattens it into this same
/// `field, value, field, value, ...` token vector before calling in, so
/// there is only ever one parsing path here.
pub fn parse_field_value_pairs(tokens: &[Arg], command: &str) -> Result<Vec<(Arg, Arg)>> {
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return Err(Error::WrongArity(command.to_string()));
    }
    Ok(tokens.chunks_exact(2).map(|c| (c[0].clone(), c[1].clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Arg {
        Arg::Str(v.to_string())
    }

    #[test]
    fn set_parses_ex_nx_get() {
        let opts = parse_set_options(&[s("EX"), s("10"), s("NX"), s("GET")]).unwrap();
        assert_eq!(opts.expiry, Some(Expiry { unit: ExpireUnit::Seconds, count: 10 }));
        assert_eq!(opts.condition, Some(SetCondition::OnlyIfDoesNotExist));
        assert!(opts.get);
        assert!(!opts.keep_ttl);
    }

    #[test]
    fn set_rejects_unknown_token() {
        assert!(parse_set_options(&[s("BOGUS")]).is_err());
    }

    #[test]
    fn zadd_incr_requires_single_pair() {
        assert!(parse_zadd_options(&[s("INCR"), s("1"), s("a"), s("2"), s("b")]).is_err());
        let ok = parse_zadd_options(&[s("INCR"), s("1"), s("a")]).unwrap();
        assert!(ok.incr);
        assert_eq!(ok.members, vec![(1.0, s("a"))]);
    }

    #[test]
    fn zadd_rejects_odd_length_pairs() {
        assert!(parse_zadd_options(&[s("1"), s("a"), s("2")]).is_err());
    }

    #[test]
    fn zrangebyscore_parses_infinities_and_limit() {
        let opts = parse_zrangebyscore_options("-inf", "+inf", &[s("LIMIT"), s("0"), s("10")], false, "ZRANGEBYSCORE").unwrap();
        assert_eq!(opts.min, ScoreBound::NegInfinity);
        assert_eq!(opts.max, ScoreBound::PosInfinity);
        assert_eq!(opts.limit, Some(RangeLimit { offset: 0, count: 10 }));
    }

    #[test]
    fn zrangebyscore_parses_exclusive_bound() {
        let opts = parse_zrangebyscore_options("(2", "5", &[], false, "ZRANGEBYSCORE").unwrap();
        assert_eq!(opts.min, ScoreBound::Exclusive(2.0));
        assert_eq!(opts.max, ScoreBound::Inclusive(5.0));
    }

    #[test]
    fn zrevrangebyscore_unswaps_descending_order() {
        // caller passes (max, min) = (5, 2); ascending internal repr is (2, 5)
        let opts = parse_zrangebyscore_options("5", "2", &[], true, "ZREVRANGEBYSCORE").unwrap();
        assert_eq!(opts.min, ScoreBound::Inclusive(2.0));
        assert_eq!(opts.max, ScoreBound::Inclusive(5.0));
        assert!(opts.reverse);
    }

    #[test]
    fn xadd_parses_nomkstream_and_maxlen_approx() {
        let (opts, fields) =
            parse_xadd_prefix(&[s("NOMKSTREAM"), s("MAXLEN"), s("~"), s("100"), s("*"), s("k"), s("v")]).unwrap();
        assert!(!opts.make_stream);
        assert_eq!(opts.id, None);
        let trim = opts.trim.unwrap();
        assert_eq!(trim.strategy, TrimStrategy::MaxLen);
        assert_eq!(trim.bound, TrimBound::Approximate);
        assert_eq!(trim.threshold, "100");
        assert_eq!(fields, &[s("k"), s("v")]);
    }

    #[test]
    fn xadd_rejects_odd_field_count() {
        assert!(parse_xadd_prefix(&[s("*"), s("k")]).is_err());
    }

    #[test]
    fn xread_splits_streams_at_midpoint() {
        let opts = parse_xread_options(&[s("COUNT"), s("5"), s("STREAMS"), s("a"), s("b"), s("0"), s("0")], "XREAD").unwrap();
        assert_eq!(opts.count, Some(5));
        assert_eq!(opts.streams, vec![("a".to_string(), "0".to_string()), ("b".to_string(), "0".to_string())]);
    }

    #[test]
    fn xreadgroup_accepts_leading_group_form() {
        let opts = parse_xread_options(&[s("GROUP"), s("g"), s("c"), s("STREAMS"), s("a"), s("0")], "XREADGROUP").unwrap();
        assert_eq!(opts.group, Some(("g".to_string(), "c".to_string())));
    }

    #[test]
    fn blocking_timeout_detected_at_either_end() {
        let (rest, timeout) = split_blocking_timeout(&[s("a"), s("b"), s("5")], "BLPOP").unwrap();
        assert_eq!(timeout, 5.0);
        assert_eq!(rest, vec![s("a"), s("b")]);

        let (rest, timeout) = split_blocking_timeout(&[s("5"), s("a"), s("b")], "BLPOP").unwrap();
        assert_eq!(timeout, 5.0);
        assert_eq!(rest, vec![s("a"), s("b")]);
    }

    #[test]
    fn field_value_pairs_reject_odd_length() {
        assert!(parse_field_value_pairs(&[s("f")], "HSET").is_err());
    }
}
