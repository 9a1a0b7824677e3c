/*!

This is the long-form manual for `mbti_shares` and `mbtiatlas`.

## Input format

The input is a comma-separated UTF-8 file with one header row. The first column is the
country name and must be called `Country`. It is followed by exactly 16 columns, one per
MBTI type code, in any order:

```text
Country,ENFJ,ENFP,ENTJ,ENTP,ESFJ,ESFP,ESTJ,ESTP,INFJ,INFP,INTJ,INTP,ISFJ,ISFP,ISTJ,ISTP
South Korea,0.08,0.08,0.04,0.05,0.03,0.07,0.06,0.05,0.05,0.09,0.05,0.06,0.07,0.08,0.08,0.06
```

Each share is a fraction in `[0, 1]`. Loading fails if a type column is missing, repeated
or unknown, if a row does not have 17 fields, if a share is not a number or out of range,
or if a country appears twice. Type codes are case-sensitive.

The shares of a row are expected to sum to 1. This is only checked loosely: rows that deviate
by more than 0.01 (the default tolerance) are reported as warnings, and the table is still loaded.

## Display order

Charts and comparisons always list the types in the following order, whatever the order of
the columns in the input:

`INFJ ISFJ INTP ISFP ENTP INFP ENTJ ISTP INTJ ESFP ESTJ ENFP ESTP ISTJ ENFJ ESFJ`

## Selection

- the primary country defaults to `South Korea` if the table contains it, and to the first
  country in alphabetical order otherwise.
- comparing is off by default. When it is turned on without naming a country, the first
  country in alphabetical order that differs from the primary country is used.
- a country cannot be compared with itself.

## Configuration

`mbtiatlas` can read its options from a JSON file passed with `--config`:

```json
{
  "dataPath": "countriesMBTI_16types.csv",
  "primaryCountry": "South Korea",
  "compareEnabled": true,
  "secondaryCountry": "United States",
  "sumTolerance": 0.01,
  "output": "chart.json"
}
```

Only `dataPath` is mandatory. Relative paths are resolved against the directory of the
configuration file. Options given on the command line take precedence.

## Output

The output is a JSON document with the selection, the long-format records (shares in percent)
and a Vega-Lite specification of the chart: a bar per type for the primary country and, when
comparing, an orange line for the second country.

 */
