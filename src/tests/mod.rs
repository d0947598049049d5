mod chunking_tests;
mod sub_parser_tests;
