/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

/// Peek the head of the .parser's token stream, returning
/// the token's start and end marks and its kind, in a three
/// item tuple (.start, .end, .kind)
///
/// Modifiers
///     ~ .parser := return .kind only
///
/// Variants
///     /1 .parser
macro_rules! peek {
    ($parser:expr) => {
        $parser
            .scanner
            .peek_token()
            .map_err($crate::event::error::ParseError::from)
            .map(|token| (token.start, token.end, token.kind()))
    };
    (~ $parser:expr) => {
        $parser
            .scanner
            .peek_token()
            .map_err($crate::event::error::ParseError::from)
            .map(|token| token.kind())
    };
}

/// Pop the head of the .parser's token stream, returning
/// the owned token, or an error if the stream was empty.
/// Typically used in combination with peek!
///
/// Variants
///     /1 .parser
macro_rules! pop {
    ($parser:expr) => {
        $parser
            .scanner
            .get_token()
            .map_err($crate::event::error::ParseError::from)
    };
}

/// ```text
/// Manipulate the given state .machine (or .parser),
/// pushing / popping states in the stack and modifying the
/// current top state
///
/// Variants
///     /1 .machine, $op .state
///     /2 .parser, $op .state *[, $op .state ]
///
///     $op :=
///         | -> (change top state)
///         | >> (push state to stack)
///         | << (pop state from stack to top)
/// ```
macro_rules! state {
    (~$parser:expr, $( $op:tt $state:expr ),+) => {
        $( state!($parser.state, $op $state); )+
    };

    ($machine:expr, -> $state:expr) => {
        *$machine.top_mut() = $state
    };
    ($machine:expr, >> $state:expr) => {
        $machine.push($state)
    };
    ($machine:expr, << $_:expr) => {
        $machine.pop()
    };
}

/// ```text
/// Consume a token of $kind from the .parser's stream,
/// returning its (start, end, context), or an error. Note
/// that the exact nature of context varies by kind.
///
/// Variants
///     /1 .parser, $kind
///
///     $kind :=
///         | StreamStart
///         | StreamEnd
///         | Alias
///         | Anchor
///         | Tag
///         | Scalar
/// ```
macro_rules! consume {
    ($parser:expr, $kind:tt) => {{
        #[allow(unused_imports)]
        use $crate::token::TokenData;

        pop!($parser).map(|token| {
            let (start, end) = (token.start, token.end);

            consume!(@entry $kind => start, end, token.data)
        })
    }};

    (@entry StreamStart => $start:expr, $end:expr, $data:expr) => {
        match $data {
            TokenData::StreamStart(encoding) => ($start, $end, encoding),
            _ => unreachable!(),
        }
    };
    (@entry StreamEnd => $start:expr, $end:expr, $data:expr) => {
        match $data {
            TokenData::StreamEnd => ($start, $end, ()),
            _ => unreachable!(),
        }
    };
    (@entry Alias => $start:expr, $end:expr, $data:expr) => {
        match $data {
            TokenData::Alias(name) => ($start, $end, name),
            _ => unreachable!(),
        }
    };
    (@entry Anchor => $start:expr, $end:expr, $data:expr) => {
        match $data {
            TokenData::Anchor(name) => ($start, $end, name),
            _ => unreachable!(),
        }
    };
    (@entry Tag => $start:expr, $end:expr, $data:expr) => {
        match $data {
            TokenData::Tag { value, divider } => ($start, $end, (value, divider)),
            _ => unreachable!(),
        }
    };
    (@entry Scalar => $start:expr, $end:expr, $data:expr) => {
        match $data {
            TokenData::Scalar(value, style) => ($start, $end, (value, style)),
            _ => unreachable!(),
        }
    };
}

/// ```text
/// Generate a new event of $kind from the given .context,
/// or consume it from the provided .parser's stream.
///
/// Variants
///     /1 @event $kind => .context
///     /2 @consume $kind => .parser
///
///     $kind :=
///         | StreamStart
///         | StreamEnd
///         | DocumentStart
///         | DocumentEnd
///         | Alias
///         | Scalar
///         | SequenceStart
///         | MappingStart
///         | SequenceEnd
///         | MappingEnd
/// ```
macro_rules! initEvent {
    (@consume $kind:tt => $parser:expr) => {{
        consume!($parser, $kind).map(|context| initEvent!(@event $kind => context))
    }};

    (@event StreamStart => $context:expr) => {{
        let (start, end, encoding) = $context;

        Event::new(start, end, EventData::StreamStart(types::StreamStart { encoding }))
    }};
    (@event StreamEnd => $context:expr) => {{
        let (start, end, ()) = $context;

        Event::new(start, end, EventData::StreamEnd)
    }};
    (@event DocumentStart => $context:expr) => {{
        let (start, end, (version, directives, implicit)) = $context;

        Event::new(start, end, EventData::DocumentStart(types::DocumentStart { implicit, version, directives }))
    }};
    (@event DocumentEnd => $context:expr) => {{
        let (start, end, implicit) = $context;

        Event::new(start, end, EventData::DocumentEnd(types::DocumentEnd { implicit }))
    }};
    (@event Alias => $context:expr) => {{
        let (start, end, name) = $context;

        Event::new(start, end, EventData::Alias(types::Alias { name }))
    }};
    (@event Scalar => $context:expr) => {{
        let (start, end, (anchor, tag, content)) = $context;

        Event::new(start, end, EventData::Scalar(types::Node { anchor, tag, content }))
    }};
    (@event SequenceStart => $context:expr) => {{
        let (start, end, (anchor, tag, implicit, style)) = $context;

        Event::new(
            start,
            end,
            EventData::SequenceStart(types::Node { anchor, tag, content: types::Sequence { implicit, style } }),
        )
    }};
    (@event MappingStart => $context:expr) => {{
        let (start, end, (anchor, tag, implicit, style)) = $context;

        Event::new(
            start,
            end,
            EventData::MappingStart(types::Node { anchor, tag, content: types::Mapping { implicit, style } }),
        )
    }};
    (@event SequenceEnd => $context:expr) => {{
        let (start, end, ()) = $context;

        Event::new(start, end, EventData::SequenceEnd)
    }};
    (@event MappingEnd => $context:expr) => {{
        let (start, end, ()) = $context;

        Event::new(start, end, EventData::MappingEnd)
    }};
}
